use super::NotificationsService;
use crate::{
    dto::{NewNotification, Notification, NotificationsFeed},
    error::Error,
    metrics::MetricsProvider,
    repository::NotificationsRepository,
    service::users_service::UsersService,
};
use async_trait::async_trait;
use std::sync::Arc;
use time::OffsetDateTime;

const DEFAULT_FEED_LIMIT: i32 = 10;
const DEFAULT_FEED_PAGE: i32 = 1;

pub struct NotificationsServiceImpl {
    repository: Arc<dyn NotificationsRepository>,
    users_service: Arc<dyn UsersService>,
    metrics: Arc<dyn MetricsProvider>,
}

impl NotificationsServiceImpl {
    pub fn new(
        repository: Arc<dyn NotificationsRepository>,
        users_service: Arc<dyn UsersService>,
        metrics: Arc<dyn MetricsProvider>,
    ) -> Self {
        Self {
            repository,
            users_service,
            metrics,
        }
    }

    fn validate_new_notification(notification: &NewNotification) -> Result<(), Error> {
        if notification.user_id <= 0 {
            return Err(Error::InvalidInput("user_id must be positive"));
        }
        if notification.notification_type.is_empty() {
            return Err(Error::InvalidInput("notification type is empty"));
        }

        Ok(())
    }

    fn validate_id(id: i64) -> Result<(), Error> {
        match id > 0 {
            true => Ok(()),
            false => Err(Error::InvalidInput("id must be positive")),
        }
    }

    fn validate_user_id(user_id: i64) -> Result<(), Error> {
        match user_id > 0 {
            true => Ok(()),
            false => Err(Error::InvalidInput("user_id must be positive")),
        }
    }

    ///
    /// Computes (limit, offset) of the requested page
    ///
    fn feed_window(limit: i32, page: i32) -> (i64, i64) {
        let limit = if limit <= 0 { DEFAULT_FEED_LIMIT } else { limit };
        let page = if page <= 0 { DEFAULT_FEED_PAGE } else { page };

        let limit = i64::from(limit);
        let offset = (i64::from(page) - 1) * limit;

        (limit, offset)
    }

    fn record<T>(&self, operation: &'static str, result: Result<T, Error>) -> Result<T, Error> {
        self.metrics
            .increment_notification_operations(operation, result.is_ok());

        result
    }

    async fn try_save_notification(&self, mut notification: NewNotification) -> Result<i64, Error> {
        tracing::info!(user_id = notification.user_id, "saving notification");
        tracing::trace!(?notification);

        Self::validate_new_notification(&notification)?;

        let user = self.users_service.get_user(notification.user_id).await?;
        tracing::trace!(user_id = user.id, "recipient exists");

        notification
            .created_at
            .get_or_insert_with(OffsetDateTime::now_utc);

        let id = self.repository.create(notification).await?;
        tracing::info!(id, "saved notification");

        Ok(id)
    }

    async fn try_get_notification_details(&self, id: i64) -> Result<Notification, Error> {
        tracing::info!(id, "finding notification");

        Self::validate_id(id)?;
        let notification = self.repository.get_by_id(id).await?;

        tracing::info!(id, "found notification");

        Ok(notification)
    }

    async fn try_get_user_notification_feed(
        &self,
        user_id: i64,
        limit: i32,
        page: i32,
    ) -> Result<NotificationsFeed, Error> {
        tracing::info!(user_id, limit, page, "finding notifications feed");

        Self::validate_user_id(user_id)?;

        let (limit, offset) = Self::feed_window(limit, page);
        let (notifications, total) = self
            .repository
            .list_by_user(user_id, limit, offset)
            .await?;

        tracing::info!(
            user_id,
            count = notifications.len(),
            total,
            "found notifications feed"
        );

        Ok(NotificationsFeed {
            notifications,
            total,
        })
    }

    async fn try_read_notification(&self, id: i64) -> Result<(), Error> {
        tracing::info!(id, "marking notification as read");

        Self::validate_id(id)?;
        self.repository.mark_as_read(id).await?;

        tracing::info!(id, "marked notification as read");

        Ok(())
    }

    async fn try_read_all_user_notifications(&self, user_id: i64) -> Result<(), Error> {
        tracing::info!(user_id, "marking all notifications as read");

        Self::validate_user_id(user_id)?;
        let updated = self.repository.mark_all_as_read(user_id).await?;

        tracing::info!(user_id, updated, "marked all notifications as read");

        Ok(())
    }

    async fn try_remove_notification(&self, id: i64) -> Result<(), Error> {
        tracing::info!(id, "removing notification");

        Self::validate_id(id)?;
        self.repository.delete(id).await?;

        tracing::info!(id, "removed notification");

        Ok(())
    }

    async fn try_get_unread_count(&self, user_id: i64) -> Result<i64, Error> {
        tracing::info!(user_id, "counting unread notifications");

        Self::validate_user_id(user_id)?;
        let count = self.repository.count_unread(user_id).await?;

        tracing::info!(user_id, count, "counted unread notifications");

        Ok(count)
    }
}

#[async_trait]
impl NotificationsService for NotificationsServiceImpl {
    async fn save_notification(&self, notification: NewNotification) -> Result<i64, Error> {
        let result = self.try_save_notification(notification).await;
        self.record("save_notification", result)
    }

    async fn get_notification_details(&self, id: i64) -> Result<Notification, Error> {
        let result = self.try_get_notification_details(id).await;
        self.record("get_notification_details", result)
    }

    async fn get_user_notification_feed(
        &self,
        user_id: i64,
        limit: i32,
        page: i32,
    ) -> Result<NotificationsFeed, Error> {
        let result = self
            .try_get_user_notification_feed(user_id, limit, page)
            .await;
        self.record("get_user_notification_feed", result)
    }

    async fn read_notification(&self, id: i64) -> Result<(), Error> {
        let result = self.try_read_notification(id).await;
        self.record("read_notification", result)
    }

    async fn read_all_user_notifications(&self, user_id: i64) -> Result<(), Error> {
        let result = self.try_read_all_user_notifications(user_id).await;
        self.record("read_all_user_notifications", result)
    }

    async fn remove_notification(&self, id: i64) -> Result<(), Error> {
        let result = self.try_remove_notification(id).await;
        self.record("remove_notification", result)
    }

    async fn get_unread_count(&self, user_id: i64) -> Result<i64, Error> {
        let result = self.try_get_unread_count(user_id).await;
        self.record("get_unread_count", result)
    }
}
