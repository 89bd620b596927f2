//! # EventDesk Page
//!
//! Interactive components of the event booking page, written as reducers over
//! an in-memory page document.
//!
//! ## Components
//!
//! - **Seats**: selection bounded by the ticket quantity, mirrored into a hidden field
//! - **Notifications**: auto-dismissing toasts
//! - **Countdowns**: per-host timers that stop at the target or when the host goes away
//! - **Booking**: one-shot disable-and-redirect buttons
//! - **Search**: live filtering of event cards
//! - **Lazy images**: deferred `src` assignment on intersection
//! - **Validation**: required fields and password confirmation
//!
//! ## Example
//!
//! ```ignore
//! use eventdesk_page::{PageAction, PageEnvironment, PageReducer, sample::sample_page};
//! use eventdesk_runtime::Store;
//!
//! let page = sample_page();
//! let store = Store::new(page.state, PageReducer::new(), environment);
//!
//! store.send(PageAction::Mounted).await?;
//! store
//!     .send(PageAction::Seat(SeatAction::Toggle { seat: page.seats[0] }))
//!     .await?;
//! ```

pub mod actions;
pub mod components;
pub mod config;
pub mod dom;
pub mod environment;
pub mod hooks;
pub mod reducer;
pub mod sample;
pub mod state;

pub use actions::{
    BookingAction, CountdownAction, FormAction, Intersection, LazyImageAction, PageAction,
    SearchAction, SeatAction, ToastAction,
};
pub use components::notifications::{Severity, ToastId};
pub use config::{ConfigError, PageConfig, SearchMode};
pub use dom::{Document, ElementBuilder, NodeId};
pub use environment::{LoggingNavigator, PageEnvironment};
pub use reducer::PageReducer;
pub use state::PageState;
