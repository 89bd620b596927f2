//! Page components.
//!
//! Each component is a reducer over [`PageState`](crate::state::PageState)
//! that handles its own action variant and ignores the rest.

pub mod booking;
pub mod countdown;
pub mod lazy_images;
pub mod notifications;
pub mod search;
pub mod seats;
pub mod validation;

pub use booking::BookingReducer;
pub use countdown::CountdownReducer;
pub use lazy_images::LazyImageReducer;
pub use notifications::NotificationReducer;
pub use search::SearchReducer;
pub use seats::SeatReducer;
pub use validation::FormReducer;
