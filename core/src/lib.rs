//! # EventDesk Core
//!
//! Core traits and types for the EventDesk page components.
//!
//! Every interactive piece of the booking page (seat picker, toasts, countdowns,
//! booking buttons) is a reducer over shared page state. Reducers never touch
//! timers or the browser directly; they return [`Effect`](effect::Effect)
//! descriptions that the runtime executes.
//!
//! ## Core Concepts
//!
//! - **State**: The page document plus per-component bookkeeping
//! - **Action**: Every input a component reacts to (clicks, timer ticks, removals)
//! - **Reducer**: Pure function `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions, including cancellable intervals
//! - **Environment**: Injected dependencies (clock, navigation)
//!
//! ## Example
//!
//! ```ignore
//! use eventdesk_core::*;
//!
//! impl Reducer for SeatReducer {
//!     type State = PageState;
//!     type Action = PageAction;
//!     type Environment = PageEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut PageState,
//!         action: PageAction,
//!         env: &PageEnvironment,
//!     ) -> SmallVec<[Effect<PageAction>; 4]> {
//!         // Seat rules go here
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

pub use effect::{Effect, TimerId};
pub use environment::{Clock, Navigator, SystemClock};
pub use reducer::Reducer;

/// Reducer composition utilities
pub mod composition;

/// Declarative macros for effect construction
pub mod effect_macros;

/// Reducer module - The core trait for component logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for component logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates state in place and returns effect descriptions for the
        /// runtime. Must not block, sleep or perform I/O.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects are values, not execution. The runtime owns every timer an effect
/// starts, so a component can only stop a periodic update or a pending timeout
/// by returning
/// [`Effect::Cancel`](effect::Effect::Cancel) with the same [`TimerId`](effect::TimerId).
pub mod effect {
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    /// Key of a cancellable periodic effect
    ///
    /// Ids are chosen by reducers and must be stable for the lifetime of the
    /// component that owns the timer (e.g. derived from the host element).
    #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct TimerId(String);

    impl TimerId {
        /// Create a timer id from any string-like key
        #[must_use]
        pub fn new(key: impl Into<String>) -> Self {
            Self(key.into())
        }

        /// The raw key
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Display for TimerId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    /// Effect type - describes a side effect to be executed
    ///
    /// Effects are NOT executed immediately. They are descriptions of what should
    /// happen, returned from reducers and executed by the Store runtime.
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects in parallel
        Parallel(Vec<Effect<Action>>),

        /// Run effects sequentially
        Sequential(Vec<Effect<Action>>),

        /// Dispatch an action once after a delay (toast lifetime, redirects)
        Delay {
            /// How long to wait
            duration: Duration,
            /// Action to dispatch after delay
            action: Box<Action>,
        },

        /// Dispatch an action once after `duration` unless cancelled
        ///
        /// Registered under `id` like an interval until it fires. Starting a
        /// timeout with an id that is already registered replaces the pending one.
        Timeout {
            /// Registry key used by [`Effect::Cancel`]
            id: TimerId,
            /// How long to wait
            duration: Duration,
            /// Action to dispatch when the timeout fires
            action: Box<Action>,
        },

        /// Dispatch an action every `period` until cancelled
        ///
        /// The first dispatch happens one full period after the effect starts.
        /// Starting an interval with an id that is already registered replaces
        /// the running one.
        Interval {
            /// Registry key used by [`Effect::Cancel`]
            id: TimerId,
            /// Time between dispatches
            period: Duration,
            /// Action dispatched on every tick
            action: Box<Action>,
        },

        /// Stop the interval or timeout registered under this id (no-op when absent)
        Cancel(TimerId),

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> fmt::Debug for Effect<Action>
    where
        Action: fmt::Debug,
    {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Delay { duration, action } => f
                    .debug_struct("Effect::Delay")
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Timeout {
                    id,
                    duration,
                    action,
                } => f
                    .debug_struct("Effect::Timeout")
                    .field("id", id)
                    .field("duration", duration)
                    .field("action", action)
                    .finish(),
                Effect::Interval { id, period, action } => f
                    .debug_struct("Effect::Interval")
                    .field("id", id)
                    .field("period", period)
                    .field("action", action)
                    .finish(),
                Effect::Cancel(id) => f.debug_tuple("Effect::Cancel").field(id).finish(),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run in parallel
        #[must_use]
        pub const fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Whether this effect (or any nested effect) cancels `id`
        #[must_use]
        pub fn cancels(&self, id: &TimerId) -> bool {
            match self {
                Effect::Cancel(cancelled) => cancelled == id,
                Effect::Parallel(effects) | Effect::Sequential(effects) => {
                    effects.iter().any(|effect| effect.cancels(id))
                },
                _ => false,
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All browser-facing dependencies are abstracted behind traits and injected
/// via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock backed by the operating system
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Navigator trait - replaces `window.location` assignments
    pub trait Navigator: Send + Sync {
        /// Leave the current page for `url`
        fn navigate(&self, url: &str);
    }
}
