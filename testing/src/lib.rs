//! # EventDesk Testing
//!
//! Testing utilities and helpers for EventDesk page components.
//!
//! This crate provides:
//! - Deterministic clocks (fixed, or following paused tokio time)
//! - A navigator that records redirects instead of leaving the page
//! - A Given-When-Then API for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use eventdesk_testing::{RecordingNavigator, TokioClock};
//! use eventdesk_runtime::Store;
//!
//! #[tokio::test(start_paused = true)]
//! async fn countdown_expires() {
//!     let clock = TokioClock::starting_at(test_time());
//!     let env = PageEnvironment::new(Arc::new(clock), Arc::new(RecordingNavigator::new()));
//!     let store = Store::new(page_state(), PageReducer::new(), env);
//!
//!     store.send(PageAction::Mounted).await?;
//!     tokio::time::sleep(Duration::from_secs(11)).await;
//! }
//! ```

use chrono::{DateTime, Utc};
use eventdesk_core::environment::{Clock, Navigator};


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Navigator, Utc};
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use eventdesk_testing::mocks::FixedClock;
    /// use eventdesk_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances with tokio time
    ///
    /// Reports `origin + (tokio::time::Instant::now() - start)`. Under a paused
    /// runtime (`#[tokio::test(start_paused = true)]`) it moves exactly as far
    /// as `tokio::time::advance`/`sleep` move the runtime, so timer-driven
    /// reducers and wall-clock arithmetic stay in lockstep.
    #[derive(Debug, Clone)]
    pub struct TokioClock {
        origin: DateTime<Utc>,
        start: tokio::time::Instant,
    }

    impl TokioClock {
        /// Start the clock at `origin`, measured from the current tokio instant
        #[must_use]
        pub fn starting_at(origin: DateTime<Utc>) -> Self {
            Self {
                origin,
                start: tokio::time::Instant::now(),
            }
        }
    }

    impl Clock for TokioClock {
        fn now(&self) -> DateTime<Utc> {
            let elapsed = tokio::time::Instant::now().duration_since(self.start);
            chrono::Duration::from_std(elapsed)
                .map_or(self.origin, |elapsed| self.origin + elapsed)
        }
    }

    /// Navigator that records every redirect
    #[derive(Debug, Clone, Default)]
    pub struct RecordingNavigator {
        visited: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingNavigator {
        /// Create a navigator with no recorded visits
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Every url navigated to, in order
        #[must_use]
        pub fn visited(&self) -> Vec<String> {
            self.visited
                .lock()
                .map(|visited| visited.clone())
                .unwrap_or_default()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, url: &str) {
            if let Ok(mut visited) = self.visited.lock() {
                visited.push(url.to_string());
            }
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_time() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .expect("hardcoded timestamp should always parse")
            .with_timezone(&Utc)
    }

    /// [`FixedClock`] at [`test_time`]
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(test_time())
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, test_time, FixedClock, RecordingNavigator, TokioClock};

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), test_time());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_follows_paused_time() {
        let clock = TokioClock::starting_at(test_time());
        assert_eq!(clock.now(), test_time());

        tokio::time::advance(Duration::from_millis(2_500)).await;

        assert_eq!(
            clock.now(),
            test_time() + chrono::Duration::milliseconds(2_500)
        );
    }

    #[test]
    fn test_recording_navigator() {
        let navigator = RecordingNavigator::new();
        let shared = navigator.clone();
        navigator.navigate("/bookings/");
        navigator.navigate("/events/2/");

        assert_eq!(shared.visited(), vec!["/bookings/", "/events/2/"]);
    }
}
