use super::error::Error;
use crate::dto::{NewNotification, Notification};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsRepository: Send + Sync {
    ///
    /// Inserts new unread notification.
    /// Current time is used when created_at is missing.
    ///
    /// ### Returns
    /// ID assigned by the database
    ///
    async fn create(&self, notification: NewNotification) -> Result<i64, Error>;

    ///
    /// ### Errors
    /// - [Error::NotificationNotFound] when notification does not exist
    ///
    async fn get_by_id(&self, id: i64) -> Result<Notification, Error>;

    ///
    /// Finds single page of user's notifications sorted descending by creation date.
    ///
    /// ### Returns
    /// Notifications on the page and number of all user's notifications
    ///
    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64), Error>;

    ///
    /// Marks notification as read. Marking already read notification succeeds.
    ///
    /// ### Errors
    /// - [Error::NotificationNotFound] when notification does not exist
    ///
    async fn mark_as_read(&self, id: i64) -> Result<(), Error>;

    ///
    /// Marks all unread notifications of the user as read.
    ///
    /// ### Returns
    /// Number of notifications that changed state
    ///
    async fn mark_all_as_read(&self, user_id: i64) -> Result<u64, Error>;

    ///
    /// ### Errors
    /// - [Error::NotificationNotFound] when notification does not exist
    ///
    async fn delete(&self, id: i64) -> Result<(), Error>;

    async fn count_unread(&self, user_id: i64) -> Result<i64, Error>;
}
