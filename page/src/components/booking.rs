//! Booking buttons.
//!
//! `Enabled → Processing → (navigation away)`. The `disabled` class is the
//! only state: a processing button ignores further clicks, and nothing ever
//! re-enables it. The redirect is a runtime timeout keyed by the button, so
//! unmounting the page before it fires means no navigation.

use crate::actions::{BookingAction, PageAction};
use crate::components::notifications::Severity;
use crate::dom::{ElementBuilder, NodeId};
use crate::environment::PageEnvironment;
use crate::hooks;
use crate::state::PageState;
use eventdesk_core::{
    async_effect, delay, effect::Effect, effect::TimerId, reducer::Reducer, smallvec, SmallVec,
};
use std::sync::Arc;

/// Where a booking button is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingPhase {
    /// Accepts a click
    Enabled,
    /// Clicked; waiting for the redirect
    Processing,
}

/// Phase of `button`, or `None` when it is not an element
#[must_use]
pub fn booking_phase(state: &PageState, button: NodeId) -> Option<BookingPhase> {
    let element = state.document.element(button)?;
    Some(if element.has_class(hooks::DISABLED) {
        BookingPhase::Processing
    } else {
        BookingPhase::Enabled
    })
}

/// Reducer for [`BookingAction`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Key of the pending redirect for `button`
    #[must_use]
    pub fn timer_id(button: NodeId) -> TimerId {
        TimerId::new(format!("booking-{}-{}", button.index(), button.generation()))
    }

    fn clicked(
        state: &mut PageState,
        button: NodeId,
        env: &PageEnvironment,
    ) -> SmallVec<[Effect<PageAction>; 4]> {
        let PageState {
            document,
            notifications,
            ..
        } = state;

        let Some(element) = document.element_mut(button) else {
            tracing::debug!(%button, "Click on unknown booking button");
            return SmallVec::new();
        };
        if element.has_class(hooks::DISABLED) {
            tracing::debug!(%button, "Booking already processing");
            return SmallVec::new();
        }

        let title = element
            .attr(hooks::EVENT_TITLE_ATTR)
            .unwrap_or_default()
            .to_string();
        element.add_class(hooks::DISABLED);

        document.clear_children(button);
        document.append(
            button,
            ElementBuilder::new("span")
                .class("spinner-border spinner-border-sm")
                .attr("role", "status")
                .attr("aria-hidden", "true"),
        );
        document.append_text(button, " Processing...");

        tracing::info!(%button, event = %title, "Booking submitted");
        let toast = notifications.show(
            document,
            &format!("🎟️ Booking confirmed for {title}!"),
            Severity::Success,
            env,
        );

        smallvec![
            toast,
            delay! {
                id: Self::timer_id(button),
                duration: env.config.redirect_delay(),
                action: PageAction::Booking(BookingAction::Redirect { button })
            }
        ]
    }

    fn redirect(state: &PageState, button: NodeId, env: &PageEnvironment) -> Option<Effect<PageAction>> {
        let Some(url) = state
            .document
            .element(button)
            .and_then(|element| element.attr(hooks::REDIRECT_URL_ATTR))
            .map(str::to_string)
        else {
            tracing::warn!(%button, "Booking button has no redirect url");
            return None;
        };

        let navigator = Arc::clone(&env.navigator);
        Some(async_effect! {
            navigator.navigate(&url);
            Some(PageAction::Booking(BookingAction::Navigated { url }))
        })
    }
}

impl Reducer for BookingReducer {
    type State = PageState;
    type Action = PageAction;
    type Environment = PageEnvironment;

    fn reduce(
        &self,
        state: &mut PageState,
        action: PageAction,
        env: &PageEnvironment,
    ) -> SmallVec<[Effect<PageAction>; 4]> {
        match action {
            PageAction::Booking(BookingAction::Clicked { button }) => Self::clicked(state, button, env),
            PageAction::Booking(BookingAction::Redirect { button }) => {
                Self::redirect(state, button, env).into_iter().collect()
            },
            PageAction::Booking(BookingAction::Navigated { url }) => {
                tracing::debug!(%url, "Page location changed");
                state.location = Some(url);
                SmallVec::new()
            },
            PageAction::Unmounted => state
                .document
                .select(|element| {
                    element.has_class(hooks::BOOK_BUTTON) && element.has_class(hooks::DISABLED)
                })
                .into_iter()
                .map(|button| Effect::Cancel(Self::timer_id(button)))
                .collect(),
            _ => SmallVec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::test_support::test_environment;
    use eventdesk_testing::{assertions, ReducerTest};
    use std::time::Duration;

    fn booking_page(redirect: Option<&str>) -> (PageState, NodeId) {
        let mut document = Document::new();
        let body = document.body();
        let mut button = ElementBuilder::new("a")
            .class("btn btn-primary book-event-btn")
            .attr("data-event-title", "Jazz Night")
            .text("Book Now");
        if let Some(url) = redirect {
            button = button.attr("data-redirect-url", url);
        }
        let button = document.append(body, button).unwrap();
        (PageState::new(document), button)
    }

    #[test]
    fn test_first_click_processes() {
        let (state, button) = booking_page(Some("/bookings/"));

        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PageAction::Booking(BookingAction::Clicked { button }))
            .then_state(move |state| {
                assert_eq!(booking_phase(state, button), Some(BookingPhase::Processing));
                assert_eq!(state.document.text_content(button), " Processing...");
                let spinner = state.document.first_by_class_within(button, "spinner-border").unwrap();
                assert!(state.document.element(spinner).unwrap().has_class("spinner-border-sm"));

                let toast = state.notifications.latest().unwrap();
                assert_eq!(toast.message, "🎟️ Booking confirmed for Jazz Night!");
                assert_eq!(toast.severity, Severity::Success);
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 2);
                assertions::assert_has_delay_of(effects, Duration::from_millis(1500));
                assertions::assert_has_delay_of(effects, Duration::from_millis(5000));
            })
            .run();
    }

    #[test]
    fn test_second_click_is_ignored() {
        let (state, button) = booking_page(Some("/bookings/"));

        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PageAction::Booking(BookingAction::Clicked { button }))
            .when_action(PageAction::Booking(BookingAction::Clicked { button }))
            .then_state(|state| {
                assert_eq!(state.notifications.toasts().len(), 1);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_redirect_navigates() {
        let (state, button) = booking_page(Some("/bookings/"));

        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PageAction::Booking(BookingAction::Clicked { button }))
            .when_action(PageAction::Booking(BookingAction::Redirect { button }))
            .then_effects(assertions::assert_has_future_effect)
            .run();

        let (state, _) = booking_page(None);
        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PageAction::Booking(BookingAction::Navigated { url: "/bookings/".into() }))
            .then_state(|state| {
                assert_eq!(state.location.as_deref(), Some("/bookings/"));
            })
            .run();
    }

    #[test]
    fn test_redirect_is_cancellable_until_it_fires() {
        let (state, button) = booking_page(Some("/bookings/"));

        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PageAction::Booking(BookingAction::Clicked { button }))
            .then_effects(move |effects| {
                assertions::assert_schedules_timeout(effects, &BookingReducer::timer_id(button));
            })
            .run();
    }

    #[test]
    fn test_unmount_cancels_pending_redirects_only() {
        let (mut state, button) = booking_page(Some("/bookings/"));
        let body = state.document.body();
        let idle = state
            .document
            .append(
                body,
                ElementBuilder::new("a")
                    .class("btn book-event-btn")
                    .attr("data-redirect-url", "/other/"),
            )
            .unwrap();
        let env = test_environment();
        let reducer = BookingReducer::new();

        let _ = reducer.reduce(&mut state, PageAction::Booking(BookingAction::Clicked { button }), &env);
        let effects = reducer.reduce(&mut state, PageAction::Unmounted, &env);

        assertions::assert_effects_count(&effects, 1);
        assertions::assert_cancels(&effects, &BookingReducer::timer_id(button));
        assert!(!effects.iter().any(|effect| effect.cancels(&BookingReducer::timer_id(idle))));
    }

    #[test]
    fn test_missing_redirect_url_stays_processing() {
        let (state, button) = booking_page(None);

        ReducerTest::new(BookingReducer::new())
            .with_env(test_environment())
            .given_state(state)
            .when_action(PageAction::Booking(BookingAction::Clicked { button }))
            .when_action(PageAction::Booking(BookingAction::Redirect { button }))
            .then_state(move |state| {
                assert_eq!(booking_phase(state, button), Some(BookingPhase::Processing));
                assert_eq!(state.location, None);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
