//! Client-side form checks run before submission.

use crate::actions::{FormAction, PageAction};
use crate::dom::{Document, NodeId};
use crate::environment::PageEnvironment;
use crate::hooks;
use crate::state::PageState;
use eventdesk_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Feedback text for a mismatched confirmation
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

/// Outcome of [`validate_form`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Form that was checked
    pub form: Option<NodeId>,
    /// Fields marked `is-invalid`, in document order
    pub invalid: Vec<NodeId>,
    /// Whether the password confirmation differs
    pub password_mismatch: bool,
}

impl ValidationReport {
    /// Whether the form may be submitted
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty() && !self.password_mismatch
    }
}

/// Mark blank required fields and a mismatched password confirmation
///
/// Required fields that are filled in lose any earlier `is-invalid`.
pub fn validate_form(document: &mut Document, form: NodeId) -> ValidationReport {
    let mut report = ValidationReport {
        form: Some(form),
        ..ValidationReport::default()
    };

    for field in document.select_within(form, |element| element.has_attr(hooks::REQUIRED_ATTR)) {
        let Some(element) = document.element_mut(field) else {
            continue;
        };
        if element.value().trim().is_empty() {
            element.add_class(hooks::IS_INVALID);
            report.invalid.push(field);
        } else {
            element.remove_class(hooks::IS_INVALID);
        }
    }

    let password = document.element_by_id_within(form, hooks::PASSWORD_ID);
    let confirmation = document.element_by_id_within(form, hooks::PASSWORD_CONFIRM_ID);
    if let (Some(password), Some(confirmation)) = (password, confirmation) {
        let value_of = |node| document.element(node).map(|e| e.value().to_string());
        if value_of(password) != value_of(confirmation) {
            report.password_mismatch = true;
            if let Some(element) = document.element_mut(confirmation) {
                element.add_class(hooks::IS_INVALID);
            }
            if !report.invalid.contains(&confirmation) {
                report.invalid.push(confirmation);
            }
            match document.next_element_sibling(confirmation) {
                Some(feedback) => document.set_text(feedback, PASSWORD_MISMATCH),
                None => tracing::debug!("No feedback element after password confirmation"),
            }
        }
    }

    report
}

/// Reducer for [`FormAction`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct FormReducer;

impl FormReducer {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for FormReducer {
    type State = PageState;
    type Action = PageAction;
    type Environment = PageEnvironment;

    fn reduce(
        &self,
        state: &mut PageState,
        action: PageAction,
        _env: &PageEnvironment,
    ) -> SmallVec<[Effect<PageAction>; 4]> {
        if let PageAction::Form(FormAction::Validate { form }) = action {
            let report = validate_form(&mut state.document, form);
            tracing::debug!(%form, valid = report.is_valid(), invalid = report.invalid.len(), "Form validated");
            state.last_validation = Some(report);
        }
        SmallVec::new()
    }
}
