pub mod category;
pub mod event;
pub mod timestamp;
pub mod user;

pub use category::Category;
pub use event::{Event, NewEvent};
pub use timestamp::{format_timestamp, parse_timestamp};
pub use user::User;

pub type EventId = i64;
pub type CategoryId = i64;
pub type UserId = i64;
