//! Page controller: every component reducer in one chain.
//!
//! Structural changes are applied first so that the components running after
//! see the document as it is once the change is done. A countdown whose host
//! was just detached is therefore disposed by the same `RemoveElement` action.

use crate::actions::PageAction;
use crate::components::{
    BookingReducer, CountdownReducer, FormReducer, LazyImageReducer, NotificationReducer,
    SearchReducer, SeatReducer,
};
use crate::environment::PageEnvironment;
use crate::state::PageState;
use eventdesk_core::composition::{combine_reducers, CombinedReducer};
use eventdesk_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Applies structural page changes to the document
#[derive(Debug, Clone, Copy, Default)]
pub struct StructureReducer;

impl Reducer for StructureReducer {
    type State = PageState;
    type Action = PageAction;
    type Environment = PageEnvironment;

    fn reduce(
        &self,
        state: &mut PageState,
        action: PageAction,
        _env: &PageEnvironment,
    ) -> SmallVec<[Effect<PageAction>; 4]> {
        match action {
            PageAction::RemoveElement { node } => {
                if state.document.remove(node) {
                    tracing::debug!(%node, "Element removed from page");
                } else {
                    tracing::trace!(%node, "Element already detached");
                }
            },
            PageAction::Mounted => tracing::info!("Page mounted"),
            PageAction::Unmounted => tracing::info!("Page unmounted"),
            _ => {},
        }
        SmallVec::new()
    }
}

/// Reducer for the whole booking page
pub struct PageReducer {
    inner: CombinedReducer<PageState, PageAction, PageEnvironment>,
}

impl PageReducer {
    /// Chain the structure reducer and every component reducer
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: combine_reducers(vec![
                Box::new(StructureReducer),
                Box::new(SearchReducer::new()),
                Box::new(SeatReducer::new()),
                Box::new(NotificationReducer::new()),
                Box::new(CountdownReducer::new()),
                Box::new(BookingReducer::new()),
                Box::new(LazyImageReducer::new()),
                Box::new(FormReducer::new()),
            ]),
        }
    }
}

impl Default for PageReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for PageReducer {
    type State = PageState;
    type Action = PageAction;
    type Environment = PageEnvironment;

    fn reduce(
        &self,
        state: &mut PageState,
        action: PageAction,
        env: &PageEnvironment,
    ) -> SmallVec<[Effect<PageAction>; 4]> {
        self.inner.reduce(state, action, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{BookingAction, SeatAction};
    use crate::components::countdown::{CountdownPhase, CountdownTimer};
    use crate::sample::{sample_page, SamplePage};
    use crate::test_support::test_environment;
    use eventdesk_testing::{assertions, ReducerTest};

    #[test]
    fn test_mount_starts_countdown_and_observes_images() {
        let SamplePage { state, countdown, .. } = sample_page();

        ReducerTest::new(PageReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PageAction::Mounted)
            .then_state(move |state| {
                assert_eq!(state.countdowns.phase(countdown), Some(CountdownPhase::Running));
                assert_eq!(state.lazy_images.len(), 1);
            })
            .then_effects(move |effects| {
                assertions::assert_starts_interval(effects, &CountdownTimer::timer_id(countdown));
            })
            .run();
    }

    #[test]
    fn test_removing_countdown_ancestor_disposes_it() {
        let SamplePage {
            state,
            countdown,
            event_details,
            ..
        } = sample_page();

        ReducerTest::new(PageReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PageAction::Mounted)
            .when_action(PageAction::RemoveElement { node: event_details })
            .then_state(move |state| {
                assert!(!state.document.is_connected(countdown));
                assert_eq!(state.countdowns.phase(countdown), None);
                assert!(state.countdowns.is_empty());
            })
            .then_effects(move |effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_cancels(effects, &CountdownTimer::timer_id(countdown));
            })
            .run();
    }

    #[test]
    fn test_seat_warning_and_booking_share_toasts() {
        let SamplePage {
            state,
            seats,
            book_button,
            ..
        } = sample_page();

        ReducerTest::new(PageReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PageAction::Seat(SeatAction::QuantityChanged { value: "1".into() }))
            .when_action(PageAction::Seat(SeatAction::Toggle { seat: seats[0] }))
            .when_action(PageAction::Seat(SeatAction::Toggle { seat: seats[1] }))
            .when_action(PageAction::Booking(BookingAction::Clicked { button: book_button }))
            .then_state(|state| {
                let messages: Vec<_> = state
                    .notifications
                    .toasts()
                    .iter()
                    .map(|toast| toast.message.as_str())
                    .collect();
                assert_eq!(
                    messages,
                    vec![
                        "You can only select 1 seats.",
                        "🎟️ Booking confirmed for Summer Jazz Night!"
                    ]
                );
                assert_eq!(state.selected_seats_field().as_deref(), Some("A1"));
            })
            .run();
    }

    #[test]
    fn test_unmount_cancels_running_countdowns() {
        let SamplePage { state, countdown, .. } = sample_page();

        ReducerTest::new(PageReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PageAction::Mounted)
            .when_action(PageAction::Unmounted)
            .then_effects(move |effects| {
                assertions::assert_cancels(effects, &CountdownTimer::timer_id(countdown));
            })
            .run();
    }
}
