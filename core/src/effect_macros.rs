//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants inside
//! reducers.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use dashboard_sync_core::async_effect;
///
/// async_effect! {
///     let orders = api.orders().await.ok()?;
///     Some(DashboardAction::OrdersLoaded { orders })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use dashboard_sync_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_secs(5),
///     action: AuthAction::ResetRegistration
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create a lifecycle effect with [`lifecycle::execute`](crate::lifecycle::execute)
///
/// # Example
///
/// ```rust,ignore
/// use dashboard_sync_core::lifecycle_effect;
///
/// lifecycle_effect! {
///     tag: "register",
///     operation: move || selector.register_user(&email, &password),
///     wrap: AuthAction::Registration
/// }
/// ```
#[macro_export]
macro_rules! lifecycle_effect {
    (
        tag: $tag:expr,
        operation: $operation:expr,
        wrap: $wrap:expr
    ) => {
        $crate::lifecycle::execute($tag, $operation, $wrap)
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::Effect;
    use crate::lifecycle::{OperationPanicked, Transition};
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestAction {
        AsyncResult { value: i32 },
        TimeoutExpired,
        Loaded(Transition<u8, TestError>),
    }

    #[derive(Clone, Debug)]
    struct TestError;

    impl From<OperationPanicked> for TestError {
        fn from(_: OperationPanicked) -> Self {
            Self
        }
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_secs(30),
            action: TestAction::TimeoutExpired
        };

        assert!(matches!(effect, Effect::Delay { .. }));
    }

    #[test]
    fn test_lifecycle_effect_macro() {
        let effect = lifecycle_effect! {
            tag: "load",
            operation: || Ok::<_, TestError>(async { Ok::<u8, TestError>(1) }),
            wrap: TestAction::Loaded
        };

        assert!(matches!(effect, Effect::Sequential(ref effects) if effects.len() == 2));
    }
}
