//! Actions understood by the page components.
//!
//! User input, timer ticks and structural changes all arrive as a
//! [`PageAction`]. Each component reacts to its own variant and ignores the
//! rest; the page-level variants are seen by every component.

use crate::components::notifications::{Severity, ToastId};
use crate::dom::NodeId;
use serde::{Deserialize, Serialize};

/// Top-level page action
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageAction {
    /// Page finished loading: discover countdowns and lazy images
    Mounted,
    /// Page is being torn down: stop every running countdown
    Unmounted,
    /// An element (and its subtree) was removed from the page
    RemoveElement {
        /// Root of the removed subtree
        node: NodeId,
    },
    /// Search box input
    Search(SearchAction),
    /// Seat picker input
    Seat(SeatAction),
    /// Toast lifecycle
    Toast(ToastAction),
    /// Countdown lifecycle
    Countdown(CountdownAction),
    /// Booking button lifecycle
    Booking(BookingAction),
    /// Intersection notifications for observed images
    LazyImage(LazyImageAction),
    /// Form submission checks
    Form(FormAction),
}

/// Search box input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchAction {
    /// The search box value changed
    QueryChanged {
        /// New raw input value
        query: String,
    },
}

/// Seat picker input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatAction {
    /// A seat was clicked
    Toggle {
        /// The clicked seat element
        seat: NodeId,
    },
    /// The ticket quantity input changed
    QuantityChanged {
        /// New raw input value
        value: String,
    },
}

/// Toast lifecycle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastAction {
    /// Display a new toast
    Show {
        /// Message shown in the toast body
        message: String,
        /// Header colour
        severity: Severity,
    },
    /// The toast's visible lifetime elapsed
    AutoHide {
        /// Toast to hide
        toast: ToastId,
    },
    /// The close button was clicked
    Dismiss {
        /// Toast to hide
        toast: ToastId,
    },
    /// The hide transition finished
    Hidden {
        /// Toast to remove
        toast: ToastId,
    },
}

/// Countdown lifecycle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountdownAction {
    /// Start counting down inside `host`
    Start {
        /// Element carrying `data-event-date`
        host: NodeId,
    },
    /// Periodic refresh
    Tick {
        /// Countdown host
        host: NodeId,
    },
    /// Stop the countdown without rendering again
    Dispose {
        /// Countdown host
        host: NodeId,
    },
}

/// Booking button lifecycle
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingAction {
    /// A booking button was clicked
    Clicked {
        /// The clicked button
        button: NodeId,
    },
    /// The redirect delay elapsed
    Redirect {
        /// The processing button
        button: NodeId,
    },
    /// The navigator was asked to leave the page
    Navigated {
        /// Destination
        url: String,
    },
}

/// A single intersection observer entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intersection {
    /// Observed image
    pub target: NodeId,
    /// Whether the image entered the viewport
    pub is_intersecting: bool,
}

/// Intersection notifications for observed images
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LazyImageAction {
    /// A batch of observer entries
    Intersections {
        /// Entries in delivery order
        entries: Vec<Intersection>,
    },
}

/// Form submission checks
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormAction {
    /// Validate the form before submission
    Validate {
        /// Form element
        form: NodeId,
    },
}

impl From<SearchAction> for PageAction {
    fn from(action: SearchAction) -> Self {
        Self::Search(action)
    }
}

impl From<SeatAction> for PageAction {
    fn from(action: SeatAction) -> Self {
        Self::Seat(action)
    }
}

impl From<ToastAction> for PageAction {
    fn from(action: ToastAction) -> Self {
        Self::Toast(action)
    }
}

impl From<CountdownAction> for PageAction {
    fn from(action: CountdownAction) -> Self {
        Self::Countdown(action)
    }
}

impl From<BookingAction> for PageAction {
    fn from(action: BookingAction) -> Self {
        Self::Booking(action)
    }
}

impl From<LazyImageAction> for PageAction {
    fn from(action: LazyImageAction) -> Self {
        Self::LazyImage(action)
    }
}

impl From<FormAction> for PageAction {
    fn from(action: FormAction) -> Self {
        Self::Form(action)
    }
}
