//! A representative event page used by the demo binary and tests.

use crate::dom::{Document, ElementBuilder, NodeId};
use crate::state::PageState;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Handles to the interesting elements of a sample page
#[derive(Debug, Clone)]
pub struct SamplePage {
    /// Page state wrapping the document
    pub state: PageState,
    /// Search box
    pub search: NodeId,
    /// Event cards in document order
    pub cards: Vec<NodeId>,
    /// Section holding the countdown
    pub event_details: NodeId,
    /// Countdown host
    pub countdown: NodeId,
    /// Available seats in document order (`A1`, `A2`, `A3`, `B1`)
    pub seats: Vec<NodeId>,
    /// A seat that is already booked
    pub booked_seat: NodeId,
    /// Ticket quantity input
    pub quantity: NodeId,
    /// Booking button
    pub book_button: NodeId,
    /// Lazily loaded banner image
    pub banner: NodeId,
    /// Signup form
    pub signup_form: NodeId,
}

/// Sample page whose event starts at 2025-01-01T00:00:10Z
#[must_use]
pub fn sample_page() -> SamplePage {
    let starts = Utc
        .with_ymd_and_hms(2025, 1, 1, 0, 0, 10)
        .single()
        .unwrap_or_default();
    sample_page_with_event(starts)
}

fn card(title: &str, text: &str) -> ElementBuilder {
    ElementBuilder::new("div").class("col-md-4 event-card").child(
        ElementBuilder::new("div").class("card").child(
            ElementBuilder::new("div")
                .class("card-body")
                .child(ElementBuilder::new("h5").class("card-title").text(title))
                .child(ElementBuilder::new("p").class("card-text").text(text)),
        ),
    )
}

fn seat(id: &str, available: bool) -> ElementBuilder {
    let class = if available { "seat seat-available" } else { "seat seat-booked" };
    ElementBuilder::new("div").class(class).attr("data-seat-id", id).text(id)
}

/// Sample page whose event starts at `starts`
#[must_use]
pub fn sample_page_with_event(starts: DateTime<Utc>) -> SamplePage {
    let mut document = Document::new();
    let body = document.body();
    let date = starts.to_rfc3339_opts(SecondsFormat::Secs, true);

    document.append(
        body,
        ElementBuilder::new("input")
            .id("eventSearch")
            .class("form-control")
            .attr("placeholder", "Search events..."),
    );
    document.append(
        body,
        ElementBuilder::new("div")
            .class("row")
            .child(card("Summer Jazz Night", "Live quartet under the stars"))
            .child(card("Indie Rock Showcase", "Five bands, one stage"))
            .child(card("Poetry Evening", "Spoken word with a jazz trio")),
    );
    document.append(
        body,
        ElementBuilder::new("section")
            .id("eventDetails")
            .child(ElementBuilder::new("h2").text("Summer Jazz Night"))
            .child(
                ElementBuilder::new("img")
                    .class("img-fluid lazy-load")
                    .attr("data-src", "/media/events/jazz-night.jpg"),
            )
            .child(
                ElementBuilder::new("div")
                    .class("event-countdown")
                    .attr("data-event-date", &date),
            ),
    );
    document.append(
        body,
        ElementBuilder::new("form")
            .id("bookingForm")
            .child(
                ElementBuilder::new("input")
                    .id("ticketQuantity")
                    .attr("type", "number")
                    .attr("value", "2"),
            )
            .child(
                ElementBuilder::new("div")
                    .class("seat-map")
                    .child(seat("A1", true))
                    .child(seat("A2", true))
                    .child(seat("A3", true))
                    .child(seat("B0", false))
                    .child(seat("B1", true)),
            )
            .child(
                ElementBuilder::new("input")
                    .id("selectedSeats")
                    .attr("type", "hidden")
                    .attr("name", "selected_seats"),
            )
            .child(
                ElementBuilder::new("a")
                    .class("btn btn-primary book-event-btn")
                    .attr("data-event-title", "Summer Jazz Night")
                    .attr("data-redirect-url", "/bookings/")
                    .text("Book Now"),
            ),
    );
    document.append(
        body,
        ElementBuilder::new("form")
            .id("signupForm")
            .child(ElementBuilder::new("input").id("id_username").attr("required", ""))
            .child(ElementBuilder::new("input").id("id_password1").attr("required", ""))
            .child(ElementBuilder::new("div").class("invalid-feedback"))
            .child(ElementBuilder::new("input").id("id_password2").attr("required", ""))
            .child(ElementBuilder::new("div").class("invalid-feedback")),
    );

    let first = |document: &Document, class: &str| {
        document.elements_by_class(class).into_iter().next().unwrap_or(body)
    };
    let by_id = |document: &Document, id: &str| document.element_by_id(id).unwrap_or(body);

    SamplePage {
        search: by_id(&document, "eventSearch"),
        cards: document.elements_by_class("event-card"),
        event_details: by_id(&document, "eventDetails"),
        countdown: first(&document, "event-countdown"),
        seats: document.elements_by_class("seat-available"),
        booked_seat: first(&document, "seat-booked"),
        quantity: by_id(&document, "ticketQuantity"),
        book_button: first(&document, "book-event-btn"),
        banner: first(&document, "lazy-load"),
        signup_form: by_id(&document, "signupForm"),
        state: PageState::new(document),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can unwrap
mod tests {
    use super::*;

    #[test]
    fn test_sample_page_handles() {
        let page = sample_page();
        let doc = &page.state.document;

        assert_eq!(page.cards.len(), 3);
        assert_eq!(page.seats.len(), 4);
        assert_eq!(
            doc.element(page.countdown).unwrap().attr("data-event-date"),
            Some("2025-01-01T00:00:10Z")
        );
        assert_eq!(doc.parent(page.countdown), Some(page.event_details));
        assert!(doc.element(page.banner).unwrap().has_class("lazy-load"));
        assert_eq!(doc.element(page.quantity).unwrap().value(), "2");
        assert_eq!(doc.element(page.signup_form).unwrap().tag(), "form");
        assert!(!doc.element(page.booked_seat).unwrap().has_class("seat-available"));
        assert_eq!(page.state.seat("B1"), Some(page.seats[3]));
    }
}
