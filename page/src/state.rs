//! Page state shared by every component.

use crate::components::countdown::CountdownRegistry;
use crate::components::lazy_images::LazyImageObserver;
use crate::components::notifications::NotificationCenter;
use crate::components::seats;
use crate::components::validation::ValidationReport;
use crate::dom::{Document, NodeId};
use crate::hooks;

/// State of one booking page
///
/// The document is the source of truth for everything visible (seat classes,
/// toast markup, countdown text). The other fields hold bookkeeping that has
/// no place in the markup.
#[derive(Debug, Clone, Default)]
pub struct PageState {
    /// The page document
    pub document: Document,
    /// Toast bookkeeping
    pub notifications: NotificationCenter,
    /// Countdown instances by host element
    pub countdowns: CountdownRegistry,
    /// Images waiting to intersect the viewport
    pub lazy_images: LazyImageObserver,
    /// Last url the page navigated to
    pub location: Option<String>,
    /// Outcome of the last form validation
    pub last_validation: Option<ValidationReport>,
}

impl PageState {
    /// Wrap an existing document
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    /// Seat element with the given `data-seat-id`
    #[must_use]
    pub fn seat(&self, seat_id: &str) -> Option<NodeId> {
        self.document
            .select(|element| {
                element.has_class(hooks::SEAT_AVAILABLE)
                    && element.attr(hooks::SEAT_ID_ATTR) == Some(seat_id)
            })
            .into_iter()
            .next()
    }

    /// Ids of the selected seats, in document order
    #[must_use]
    pub fn selected_seat_ids(&self) -> Vec<String> {
        seats::selected_seats(&self.document)
            .into_iter()
            .filter_map(|seat| seats::seat_id(&self.document, seat))
            .collect()
    }

    /// Current value of the hidden `selectedSeats` field
    #[must_use]
    pub fn selected_seats_field(&self) -> Option<String> {
        let field = self.document.element_by_id(hooks::SELECTED_SEATS_ID)?;
        Some(self.document.element(field)?.value().to_string())
    }

    /// Element with the given `id` attribute
    #[must_use]
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document.element_by_id(id)
    }
}
