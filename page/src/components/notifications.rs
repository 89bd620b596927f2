//! Toast notifications.
//!
//! Toasts live in a fixed `#toastContainer` created on first use. Each toast
//! hides itself after the configured lifetime; hiding is a two-step transition
//! (`show` → `hiding`, then removal) and both steps tolerate the element being
//! gone already, so a manual dismissal racing the timed one is harmless.
//!
//! Both steps are runtime timeouts keyed by the toast id: a dismissal replaces
//! the pending auto-hide, and unmounting the page cancels whatever is pending.

use crate::actions::{PageAction, ToastAction};
use crate::dom::{Document, ElementBuilder, NodeId};
use crate::environment::PageEnvironment;
use crate::hooks;
use crate::state::PageState;
use eventdesk_core::{delay, effect::Effect, effect::TimerId, reducer::Reducer, smallvec, SmallVec};
use serde::{Deserialize, Serialize};
use std::fmt;

const SHOW: &str = "show";
const HIDING: &str = "hiding";

/// Unique toast element id
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ToastId(String);

impl ToastId {
    /// Wrap an element id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The element id
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the pending hide step for this toast
    #[must_use]
    pub fn timer_id(&self) -> TimerId {
        TimerId::new(self.0.as_str())
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Toast header colour
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral information
    #[default]
    Info,
    /// Completed action
    Success,
    /// Rejected input
    Warning,
    /// Failure
    Danger,
}

impl Severity {
    /// Bootstrap contextual name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a toast is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPhase {
    /// Displayed
    Visible,
    /// Hide transition running
    Hiding,
}

/// A toast currently in the document
#[derive(Clone, Debug)]
pub struct Toast {
    /// Element id
    pub id: ToastId,
    /// Toast element
    pub node: NodeId,
    /// Body text
    pub message: String,
    /// Header colour
    pub severity: Severity,
    /// Lifecycle phase
    pub phase: ToastPhase,
}

/// Creates, hides and removes toasts
#[derive(Clone, Debug, Default)]
pub struct NotificationCenter {
    sequence: u64,
    toasts: Vec<Toast>,
}

impl NotificationCenter {
    /// Toasts still in the document, oldest first
    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Toast by id
    #[must_use]
    pub fn find(&self, id: &ToastId) -> Option<&Toast> {
        self.toasts.iter().find(|toast| &toast.id == id)
    }

    /// Most recent toast, if any
    #[must_use]
    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.last()
    }

    /// Append a toast and schedule its auto-hide
    ///
    /// The returned effect must be handed to the runtime, otherwise the toast
    /// stays until dismissed.
    pub fn show(
        &mut self,
        document: &mut Document,
        message: &str,
        severity: Severity,
        env: &PageEnvironment,
    ) -> Effect<PageAction> {
        let Some(container) = ensure_container(document) else {
            tracing::warn!("Toast container could not be created");
            return Effect::None;
        };

        self.sequence += 1;
        let id = ToastId::new(format!(
            "toast-{}-{}",
            env.clock.now().timestamp_millis(),
            self.sequence
        ));

        let Some(node) = document.append(container, toast_markup(&id, message, severity)) else {
            return Effect::None;
        };

        tracing::debug!(toast = %id, %severity, "Toast shown");
        self.toasts.push(Toast {
            id: id.clone(),
            node,
            message: message.to_string(),
            severity,
            phase: ToastPhase::Visible,
        });

        delay! {
            id: id.timer_id(),
            duration: env.config.toast_lifetime(),
            action: PageAction::Toast(ToastAction::AutoHide { toast: id })
        }
    }

    /// Start the hide transition
    ///
    /// No-op when the toast is gone or already hiding.
    pub fn hide(
        &mut self,
        document: &mut Document,
        id: &ToastId,
        env: &PageEnvironment,
    ) -> Effect<PageAction> {
        self.prune(document);
        let Some(toast) = self.toasts.iter_mut().find(|toast| &toast.id == id) else {
            tracing::trace!(toast = %id, "Hide for missing toast ignored");
            return Effect::None;
        };
        if toast.phase == ToastPhase::Hiding {
            return Effect::None;
        }
        let Some(element) = document.element_mut(toast.node) else {
            return Effect::None;
        };
        if element.has_class(HIDING) {
            return Effect::None;
        }

        element.remove_class(SHOW);
        element.add_class(HIDING);
        toast.phase = ToastPhase::Hiding;
        tracing::debug!(toast = %id, "Toast hiding");

        delay! {
            id: id.timer_id(),
            duration: env.config.toast_transition(),
            action: PageAction::Toast(ToastAction::Hidden { toast: id.clone() })
        }
    }

    /// Remove a toast element; returns `false` if it was already gone
    pub fn remove(&mut self, document: &mut Document, id: &ToastId) -> bool {
        let Some(position) = self.toasts.iter().position(|toast| &toast.id == id) else {
            return false;
        };
        let toast = self.toasts.remove(position);
        let removed = document.remove(toast.node);
        if removed {
            tracing::debug!(toast = %id, "Toast removed");
        }
        removed
    }

    /// Cancel the pending hide step of every toast
    ///
    /// The toasts stay where they are.
    #[must_use]
    pub fn cancel_timers(&self) -> SmallVec<[Effect<PageAction>; 4]> {
        self.toasts
            .iter()
            .map(|toast| Effect::Cancel(toast.id.timer_id()))
            .collect()
    }

    /// Forget toasts whose elements left the document
    pub fn prune(&mut self, document: &Document) {
        self.toasts.retain(|toast| document.is_connected(toast.node));
    }
}

fn ensure_container(document: &mut Document) -> Option<NodeId> {
    if let Some(container) = document.element_by_id(hooks::TOAST_CONTAINER_ID) {
        return Some(container);
    }
    let body = document.body();
    document.append(
        body,
        ElementBuilder::new("div")
            .id(hooks::TOAST_CONTAINER_ID)
            .class("toast-container position-fixed top-0 end-0 p-3"),
    )
}

fn toast_markup(id: &ToastId, message: &str, severity: Severity) -> ElementBuilder {
    ElementBuilder::new("div")
        .id(id.as_str())
        .class("toast show fade")
        .attr("role", "alert")
        .attr("aria-live", "assertive")
        .attr("aria-atomic", "true")
        .child(
            ElementBuilder::new("div")
                .class(&format!("toast-header bg-{severity} text-white"))
                .child(ElementBuilder::new("strong").class("me-auto").text("Notification"))
                .child(
                    ElementBuilder::new("button")
                        .class("btn-close btn-close-white")
                        .attr("type", "button")
                        .attr("data-bs-dismiss", "toast")
                        .attr("aria-label", "Close"),
                ),
        )
        .child(ElementBuilder::new("div").class("toast-body").text(message))
}

/// Reducer for [`ToastAction`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationReducer;

impl NotificationReducer {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for NotificationReducer {
    type State = PageState;
    type Action = PageAction;
    type Environment = PageEnvironment;

    fn reduce(
        &self,
        state: &mut PageState,
        action: PageAction,
        env: &PageEnvironment,
    ) -> SmallVec<[Effect<PageAction>; 4]> {
        let PageState {
            document,
            notifications,
            ..
        } = state;

        match action {
            PageAction::Toast(ToastAction::Show { message, severity }) => {
                smallvec![notifications.show(document, &message, severity, env)]
            },
            PageAction::Toast(
                ToastAction::AutoHide { toast } | ToastAction::Dismiss { toast },
            ) => smallvec![notifications.hide(document, &toast, env)],
            PageAction::Toast(ToastAction::Hidden { toast }) => {
                notifications.remove(document, &toast);
                SmallVec::new()
            },
            PageAction::RemoveElement { .. } => {
                notifications.prune(document);
                SmallVec::new()
            },
            PageAction::Unmounted => notifications.cancel_timers(),
            _ => SmallVec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;
    use crate::test_support::test_environment;
    use eventdesk_testing::{assertions, ReducerTest};
    use std::time::Duration;

    fn show(message: &str, severity: Severity) -> PageAction {
        PageAction::Toast(ToastAction::Show {
            message: message.to_string(),
            severity,
        })
    }

    #[test]
    fn test_show_creates_container_and_schedules_hide() {
        ReducerTest::new(NotificationReducer::new())
            .with_env(test_environment())
            .given_state(PageState::default())
            .when_action(show("Saved", Severity::Success))
            .then_state(|state| {
                let doc = &state.document;
                let container = doc.element_by_id("toastContainer").unwrap();
                assert_eq!(
                    doc.element(container).unwrap().classes().join(" "),
                    "toast-container position-fixed top-0 end-0 p-3"
                );

                let toast = state.notifications.latest().unwrap();
                assert!(toast.id.as_str().starts_with("toast-1735689600000-"));
                let element = doc.element(toast.node).unwrap();
                assert!(element.has_class("show"));
                assert!(element.has_class("fade"));
                assert_eq!(doc.parent(toast.node), Some(container));

                let header = doc.first_by_class_within(toast.node, "toast-header").unwrap();
                assert!(doc.element(header).unwrap().has_class("bg-success"));
                let body = doc.first_by_class_within(toast.node, "toast-body").unwrap();
                assert_eq!(doc.text_content(body), "Saved");
            })
            .then_effects(|effects| {
                assertions::assert_has_delay_of(effects, Duration::from_millis(5000));
            })
            .run();
    }

    #[test]
    fn test_rapid_shows_do_not_collide() {
        ReducerTest::new(NotificationReducer::new())
            .with_env(test_environment())
            .given_state(PageState::default())
            .when_action(show("x", Severity::Warning))
            .when_action(show("y", Severity::Info))
            .then_state(|state| {
                let toasts = state.notifications.toasts();
                assert_eq!(toasts.len(), 2);
                assert_ne!(toasts[0].id, toasts[1].id);
                assert_eq!(state.document.elements_by_class("toast-container").len(), 1);
                assert_eq!(toasts[0].severity, Severity::Warning);
                assert_eq!(toasts[1].message, "y");
            })
            .run();
    }

    #[test]
    fn test_hide_is_two_step_and_idempotent() {
        let env = test_environment();
        let mut state = PageState::default();
        let reducer = NotificationReducer::new();

        let _ = reducer.reduce(&mut state, show("x", Severity::Info), &env);
        let toast = state.notifications.latest().unwrap().clone();

        let effects = reducer.reduce(
            &mut state,
            PageAction::Toast(ToastAction::Dismiss { toast: toast.id.clone() }),
            &env,
        );
        assertions::assert_has_delay_of(&effects, Duration::from_millis(150));
        let element = state.document.element(toast.node).unwrap();
        assert!(!element.has_class("show"));
        assert!(element.has_class("hiding"));

        // Timed hide arriving during the transition
        let effects = reducer.reduce(
            &mut state,
            PageAction::Toast(ToastAction::AutoHide { toast: toast.id.clone() }),
            &env,
        );
        assertions::assert_no_effects(&effects);

        let _ = reducer.reduce(
            &mut state,
            PageAction::Toast(ToastAction::Hidden { toast: toast.id.clone() }),
            &env,
        );
        assert!(!state.document.is_connected(toast.node));
        assert!(state.notifications.toasts().is_empty());

        // Everything after removal is a no-op
        for action in [
            ToastAction::AutoHide { toast: toast.id.clone() },
            ToastAction::Hidden { toast: toast.id.clone() },
        ] {
            let effects = reducer.reduce(&mut state, PageAction::Toast(action), &env);
            assertions::assert_no_effects(&effects);
        }
    }

    #[test]
    fn test_dismissal_replaces_pending_auto_hide() {
        let env = test_environment();
        let mut state = PageState::default();
        let reducer = NotificationReducer::new();

        let effects = reducer.reduce(&mut state, show("x", Severity::Info), &env);
        let toast = state.notifications.latest().unwrap().clone();
        assertions::assert_schedules_timeout(&effects, &toast.id.timer_id());

        let effects = reducer.reduce(
            &mut state,
            PageAction::Toast(ToastAction::Dismiss { toast: toast.id.clone() }),
            &env,
        );
        assertions::assert_schedules_timeout(&effects, &toast.id.timer_id());
        assertions::assert_has_delay_of(&effects, Duration::from_millis(150));
    }

    #[test]
    fn test_unmount_cancels_every_pending_hide() {
        let env = test_environment();
        let mut state = PageState::default();
        let reducer = NotificationReducer::new();

        let _ = reducer.reduce(&mut state, show("x", Severity::Info), &env);
        let _ = reducer.reduce(&mut state, show("y", Severity::Warning), &env);
        let toasts = state.notifications.toasts().to_vec();

        let effects = reducer.reduce(&mut state, PageAction::Unmounted, &env);
        assertions::assert_effects_count(&effects, 2);
        for toast in &toasts {
            assertions::assert_cancels(&effects, &toast.id.timer_id());
        }
        assert_eq!(state.notifications.toasts().len(), 2);
    }

    #[test]
    fn test_externally_removed_toast_is_forgotten() {
        let env = test_environment();
        let mut state = PageState::default();
        let reducer = NotificationReducer::new();

        let _ = reducer.reduce(&mut state, show("x", Severity::Danger), &env);
        let container = state.document.element_by_id("toastContainer").unwrap();
        state.document.remove(container);

        let _ = reducer.reduce(&mut state, PageAction::RemoveElement { node: container }, &env);
        assert!(state.notifications.toasts().is_empty());

        // A new toast recreates the container
        let _ = reducer.reduce(&mut state, show("y", Severity::Info), &env);
        assert!(state.document.element_by_id("toastContainer").is_some());
        assert_eq!(state.notifications.toasts().len(), 1);
    }

    #[test]
    fn test_message_is_text_not_markup() {
        let env = test_environment();
        let mut state = PageState::default();
        let effect = state.notifications.show(
            &mut state.document,
            "<b>bold</b>",
            Severity::Info,
            &env,
        );
        assert!(matches!(effect, Effect::Timeout { .. }));

        let toast = state.notifications.latest().unwrap();
        assert!(state.document.render(toast.node).contains("&lt;b&gt;bold&lt;/b&gt;"));
    }
}
