mod notification;
mod notifications_feed;
mod user;

pub use notification::*;
pub use notifications_feed::*;
pub use user::*;
