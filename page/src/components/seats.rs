//! Seat selection bounded by the ticket quantity.
//!
//! Selection state lives in the `seat-selected` class of each seat. The limit
//! is read from `#ticketQuantity` every time it is needed, and the hidden
//! `#selectedSeats` field is rewritten after every operation.

use crate::actions::{PageAction, SeatAction};
use crate::components::notifications::Severity;
use crate::dom::{Document, NodeId};
use crate::environment::PageEnvironment;
use crate::hooks;
use crate::state::PageState;
use eventdesk_core::{effect::Effect, reducer::Reducer, SmallVec};

/// Parse the leading integer of `input` the way form inputs are read
///
/// Skips leading whitespace, accepts one sign and then as many digits as
/// follow. Returns `None` when no digit is found. Out-of-range values saturate.
#[must_use]
pub fn parse_int_prefix(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = rest
        .find(|c: char| !c.is_ascii_digit())
        .map_or(rest, |end| &rest[..end]);
    if digits.is_empty() {
        return None;
    }

    let magnitude = digits.bytes().fold(0_i64, |acc, digit| {
        acc.saturating_mul(10).saturating_add(i64::from(digit - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Current seat limit from `#ticketQuantity`
///
/// A missing input or an unparseable value means nothing can be selected.
#[must_use]
pub fn read_max_seats(document: &Document) -> usize {
    let Some(input) = document
        .element_by_id(hooks::TICKET_QUANTITY_ID)
        .and_then(|node| document.element(node))
    else {
        tracing::warn!("Ticket quantity input missing; seat limit is 0");
        return 0;
    };

    match parse_int_prefix(input.value()) {
        Some(max) => usize::try_from(max.max(0)).unwrap_or(usize::MAX),
        None => {
            tracing::warn!(value = input.value(), "Unparseable ticket quantity; seat limit is 0");
            0
        },
    }
}

/// Selected seats in document order
#[must_use]
pub fn selected_seats(document: &Document) -> Vec<NodeId> {
    document.elements_by_class(hooks::SEAT_SELECTED)
}

/// The `data-seat-id` of a seat element
#[must_use]
pub fn seat_id(document: &Document, seat: NodeId) -> Option<String> {
    document
        .element(seat)
        .and_then(|element| element.attr(hooks::SEAT_ID_ATTR))
        .map(str::to_string)
}

/// Write the comma-joined selection into `#selectedSeats`
pub fn sync_selected_field(document: &mut Document) {
    let joined = selected_seats(document)
        .into_iter()
        .filter_map(|seat| seat_id(document, seat))
        .collect::<Vec<_>>()
        .join(",");

    match document
        .element_by_id(hooks::SELECTED_SEATS_ID)
        .and_then(|node| document.element_mut(node))
    {
        Some(field) => field.set_value(joined),
        None => tracing::debug!("No selectedSeats field on page"),
    }
}

/// Reducer for [`SeatAction`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct SeatReducer;

impl SeatReducer {
    /// Create the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn toggle(state: &mut PageState, seat: NodeId, env: &PageEnvironment) -> Option<Effect<PageAction>> {
        let PageState {
            document,
            notifications,
            ..
        } = state;

        let is_selected = match document.element(seat) {
            Some(element) if element.has_class(hooks::SEAT_AVAILABLE) => {
                element.has_class(hooks::SEAT_SELECTED)
            },
            _ => {
                tracing::debug!(%seat, "Toggle ignored: not an available seat");
                return None;
            },
        };

        let mut effect = None;
        if is_selected {
            if let Some(element) = document.element_mut(seat) {
                element.remove_class(hooks::SEAT_SELECTED);
            }
            tracing::debug!(%seat, "Seat deselected");
        } else {
            let max_seats = read_max_seats(document);
            let selected = selected_seats(document).len();
            if selected < max_seats {
                if let Some(element) = document.element_mut(seat) {
                    element.add_class(hooks::SEAT_SELECTED);
                }
                tracing::debug!(%seat, selected = selected + 1, max_seats, "Seat selected");
            } else {
                tracing::debug!(%seat, max_seats, "Seat limit reached");
                effect = Some(notifications.show(
                    document,
                    &format!("You can only select {max_seats} seats."),
                    Severity::Warning,
                    env,
                ));
            }
        }

        sync_selected_field(document);
        effect
    }

    fn quantity_changed(
        state: &mut PageState,
        value: &str,
        env: &PageEnvironment,
    ) -> Option<Effect<PageAction>> {
        let PageState {
            document,
            notifications,
            ..
        } = state;

        let Some(input) = document
            .element_by_id(hooks::TICKET_QUANTITY_ID)
            .and_then(|node| document.element_mut(node))
        else {
            tracing::debug!("Quantity change ignored: no ticket quantity input");
            return None;
        };
        input.set_value(value);

        let max_seats = read_max_seats(document);
        let selected = selected_seats(document);

        let mut effect = None;
        if selected.len() > max_seats {
            effect = Some(notifications.show(
                document,
                &format!("Reducing selection to {max_seats} seats."),
                Severity::Info,
                env,
            ));
            for seat in &selected[max_seats..] {
                if let Some(element) = document.element_mut(*seat) {
                    element.remove_class(hooks::SEAT_SELECTED);
                }
            }
            tracing::debug!(from = selected.len(), to = max_seats, "Selection reduced");
        }

        sync_selected_field(document);
        effect
    }
}

impl Reducer for SeatReducer {
    type State = PageState;
    type Action = PageAction;
    type Environment = PageEnvironment;

    fn reduce(
        &self,
        state: &mut PageState,
        action: PageAction,
        env: &PageEnvironment,
    ) -> SmallVec<[Effect<PageAction>; 4]> {
        let effect = match action {
            PageAction::Seat(SeatAction::Toggle { seat }) => Self::toggle(state, seat, env),
            PageAction::Seat(SeatAction::QuantityChanged { value }) => {
                Self::quantity_changed(state, &value, env)
            },
            _ => None,
        };
        effect.into_iter().collect()
    }
}
