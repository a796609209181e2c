use crate::{
    dto::{NewNotification, Notification, NotificationsFeed},
    error::Error,
};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    ///
    /// Save new unread notification for existing user.
    ///
    /// ### Returns
    /// ID of created notification
    ///
    /// ### Errors
    /// - [Error::InvalidInput] when
    ///     - user_id is not positive
    ///     - notification type is empty
    /// - [Error::UserNotFound] when user does not exist
    ///
    async fn save_notification(&self, notification: NewNotification) -> Result<i64, Error>;

    ///
    /// ### Errors
    /// - [Error::InvalidInput] when id is not positive
    /// - [Error::NotificationNotFound] when notification does not exist
    ///
    async fn get_notification_details(&self, id: i64) -> Result<Notification, Error>;

    ///
    /// Find page of user's notifications, newest first.
    /// Not positive limit defaults to 10 and not positive page defaults to 1.
    ///
    /// ### Errors
    /// - [Error::InvalidInput] when user_id is not positive
    ///
    async fn get_user_notification_feed(
        &self,
        user_id: i64,
        limit: i32,
        page: i32,
    ) -> Result<NotificationsFeed, Error>;

    ///
    /// ### Errors
    /// - [Error::InvalidInput] when id is not positive
    /// - [Error::NotificationNotFound] when notification does not exist
    ///
    async fn read_notification(&self, id: i64) -> Result<(), Error>;

    ///
    /// Mark every user's notification as read.
    /// User without unread notifications is not an error.
    ///
    /// ### Errors
    /// - [Error::InvalidInput] when user_id is not positive
    ///
    async fn read_all_user_notifications(&self, user_id: i64) -> Result<(), Error>;

    ///
    /// ### Errors
    /// - [Error::InvalidInput] when id is not positive
    /// - [Error::NotificationNotFound] when notification does not exist
    ///
    async fn remove_notification(&self, id: i64) -> Result<(), Error>;

    ///
    /// ### Errors
    /// - [Error::InvalidInput] when user_id is not positive
    ///
    async fn get_unread_count(&self, user_id: i64) -> Result<i64, Error>;
}
