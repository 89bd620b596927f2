//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when reducers schedule work: one-shot
//! delays, periodic ticks and async blocks.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use eventdesk_core::async_effect;
///
/// async_effect! {
///     navigator.navigate(&url);
///     Some(PageAction::Booking(BookingAction::Navigated { url }))
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
/// With an `id`, the delay becomes a cancellable `Effect::Timeout`.
///
/// # Example
///
/// ```rust,ignore
/// use eventdesk_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_millis(150),
///     action: PageAction::Toast(ToastAction::Hidden { toast })
/// }
///
/// delay! {
///     id: BookingReducer::timer_id(button),
///     duration: Duration::from_millis(1500),
///     action: PageAction::Booking(BookingAction::Redirect { button })
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
    (
        id: $id:expr,
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Timeout {
            id: $id,
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create an `Effect::Interval` registered under a timer id
///
/// # Example
///
/// ```rust,ignore
/// use eventdesk_core::every;
/// use std::time::Duration;
///
/// every! {
///     id: CountdownTimer::timer_id(host),
///     period: Duration::from_secs(1),
///     action: PageAction::Countdown(CountdownAction::Tick { host })
/// }
/// ```
#[macro_export]
macro_rules! every {
    (
        id: $id:expr,
        period: $period:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Interval {
            id: $id,
            period: $period,
            action: ::std::boxed::Box::new($action),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::{Effect, TimerId};
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestAction {
        Navigated { url: String },
        HideToast,
        Tick,
    }

    #[test]
    fn test_async_effect_macro() {
        let url = "/bookings/".to_string();
        let effect = async_effect! {
            Some(TestAction::Navigated { url })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_millis(5000),
            action: TestAction::HideToast
        };

        assert!(matches!(
            effect,
            Effect::Delay { duration, .. } if duration == Duration::from_millis(5000)
        ));
    }

    #[test]
    fn test_delay_macro_with_id_is_cancellable() {
        let id = TimerId::new("booking-4");
        let effect = delay! {
            id: id.clone(),
            duration: Duration::from_millis(1500),
            action: TestAction::HideToast
        };

        match &effect {
            Effect::Timeout { id: scheduled, duration, .. } => {
                assert_eq!(scheduled, &id);
                assert_eq!(*duration, Duration::from_millis(1500));
            },
            other => unreachable!("expected timeout, got {other:?}"),
        }
        assert!(!effect.cancels(&id));
    }

    #[test]
    fn test_every_macro() {
        let effect = every! {
            id: TimerId::new("countdown-1"),
            period: Duration::from_secs(1),
            action: TestAction::Tick
        };

        match effect {
            Effect::Interval { id, period, action } => {
                assert_eq!(id.as_str(), "countdown-1");
                assert_eq!(period, Duration::from_secs(1));
                assert!(matches!(*action, TestAction::Tick));
            },
            other => unreachable!("expected interval, got {other:?}"),
        }
    }
}
