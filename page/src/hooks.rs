//! Hook contract with the page markup
//!
//! Element ids, class names and data attributes the components look for.
//! Markup that lacks a hook simply does not get the matching behaviour.

/// Search box filtering the event cards
pub const EVENT_SEARCH_ID: &str = "eventSearch";
/// Event card container
pub const EVENT_CARD: &str = "event-card";
/// Card title inside an event card
pub const CARD_TITLE: &str = "card-title";
/// Card description inside an event card
pub const CARD_TEXT: &str = "card-text";
/// Applied to cards revealed by the search filter
pub const FADE_IN: &str = "fade-in";

/// Seat that can be toggled
pub const SEAT_AVAILABLE: &str = "seat-available";
/// Seat currently in the selection
pub const SEAT_SELECTED: &str = "seat-selected";
/// Stable seat key
pub const SEAT_ID_ATTR: &str = "data-seat-id";
/// Quantity input bounding the selection
pub const TICKET_QUANTITY_ID: &str = "ticketQuantity";
/// Hidden field receiving the comma-joined selection
pub const SELECTED_SEATS_ID: &str = "selectedSeats";

/// Countdown host element
pub const EVENT_COUNTDOWN: &str = "event-countdown";
/// Countdown target timestamp
pub const EVENT_DATE_ATTR: &str = "data-event-date";

/// Image waiting for its real source
pub const LAZY_LOAD: &str = "lazy-load";
/// Deferred image source
pub const DATA_SRC: &str = "data-src";

/// Booking button
pub const BOOK_BUTTON: &str = "book-event-btn";
/// Event title shown in the booking confirmation
pub const EVENT_TITLE_ATTR: &str = "data-event-title";
/// Where a booking button leads once processed
pub const REDIRECT_URL_ATTR: &str = "data-redirect-url";
/// Marks a button that no longer reacts to clicks
pub const DISABLED: &str = "disabled";

/// Fixed container holding every toast
pub const TOAST_CONTAINER_ID: &str = "toastContainer";

/// Password field of the signup form
pub const PASSWORD_ID: &str = "id_password1";
/// Password confirmation field of the signup form
pub const PASSWORD_CONFIRM_ID: &str = "id_password2";
/// Marks a field that failed validation
pub const IS_INVALID: &str = "is-invalid";
/// Boolean attribute marking a mandatory field
pub const REQUIRED_ATTR: &str = "required";
