use super::Notification;

///
/// Single page of user's notifications, newest first.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationsFeed {
    pub notifications: Vec<Notification>,
    /// Number of all user's notifications, not only those on the page
    pub total: i64,
}
