use super::{Error, NotificationsRepository};
use crate::{
    dto::{NewNotification, Notification},
    metrics::MetricsProvider,
};
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use std::{sync::Arc, time::Instant};
use time::OffsetDateTime;

const NOTIFICATIONS: &str = "notifications";
const INDEX_NAME_USER_ID_CREATED_AT: &str = "index_notifications_user_id_created_at";
const INDEX_NAME_UNREAD_USER_ID: &str = "index_notifications_unread_user_id";

#[derive(Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
enum Query {
    Create,
    GetById,
    ListByUser,
    CountByUser,
    MarkAsRead,
    MarkAllAsRead,
    Delete,
    CountUnread,
}

pub struct NotificationsRepositoryImpl {
    pool: PgPool,
    metrics: Arc<dyn MetricsProvider>,
}

impl NotificationsRepositoryImpl {
    pub async fn new(pool: PgPool, metrics: Arc<dyn MetricsProvider>) -> Result<Self, sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS notifications (
                id BIGSERIAL PRIMARY KEY,
                user_id BIGINT NOT NULL,
                type TEXT NOT NULL,
                is_read BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                payload BYTEA NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        tracing::debug!("created table {NOTIFICATIONS}");

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS index_notifications_user_id_created_at
                ON notifications (user_id, created_at DESC)",
        )
        .execute(&pool)
        .await?;
        tracing::debug!("created index {NOTIFICATIONS}.{INDEX_NAME_USER_ID_CREATED_AT}");

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS index_notifications_unread_user_id
                ON notifications (user_id) WHERE is_read = FALSE",
        )
        .execute(&pool)
        .await?;
        tracing::debug!("created index {NOTIFICATIONS}.{INDEX_NAME_UNREAD_USER_ID}");

        Ok(Self { pool, metrics })
    }

    ///
    /// Records metrics of the query and translates sqlx error into repository error.
    /// Missing row means missing notification for every query except insert.
    ///
    fn finish<T>(
        &self,
        query: Query,
        started_at: Instant,
        result: Result<T, sqlx::Error>,
    ) -> Result<T, Error> {
        let query_type: &'static str = query.into();
        self.metrics
            .increment_database_queries(query_type, result.is_ok());
        self.metrics
            .record_database_query_duration(query_type, started_at.elapsed());

        result.map_err(|err| match err {
            sqlx::Error::RowNotFound if query != Query::Create => Error::NotificationNotFound,
            err => {
                tracing::error!(query_type, %err, "database query failed");
                Error::DatabaseQuery
            }
        })
    }

    fn notification_from_row(row: &PgRow) -> Result<Notification, sqlx::Error> {
        Ok(Notification {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            notification_type: row.try_get("type")?,
            is_read: row.try_get("is_read")?,
            created_at: row.try_get("created_at")?,
            payload: row.try_get("payload")?,
        })
    }
}

#[async_trait]
impl NotificationsRepository for NotificationsRepositoryImpl {
    async fn create(&self, notification: NewNotification) -> Result<i64, Error> {
        let created_at = notification
            .created_at
            .unwrap_or_else(OffsetDateTime::now_utc);

        let started_at = Instant::now();
        let result = sqlx::query_scalar::<_, i64>(
            "INSERT INTO notifications (user_id, type, is_read, created_at, payload)
            VALUES ($1, $2, FALSE, $3, $4)
            RETURNING id",
        )
        .bind(notification.user_id)
        .bind(&notification.notification_type)
        .bind(created_at)
        .bind(&notification.payload)
        .fetch_one(&self.pool)
        .await;

        self.finish(Query::Create, started_at, result)
    }

    async fn get_by_id(&self, id: i64) -> Result<Notification, Error> {
        let started_at = Instant::now();
        let result = sqlx::query(
            "SELECT id, user_id, type, is_read, created_at, payload
            FROM notifications
            WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .and_then(|row| Self::notification_from_row(&row));

        self.finish(Query::GetById, started_at, result)
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Notification>, i64), Error> {
        let started_at = Instant::now();
        let result = sqlx::query(
            "SELECT id, user_id, type, is_read, created_at, payload
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .and_then(|rows| {
            rows.iter()
                .map(Self::notification_from_row)
                .collect::<Result<Vec<_>, _>>()
        });
        let notifications: Vec<Notification> =
            self.finish(Query::ListByUser, started_at, result)?;

        let started_at = Instant::now();
        let result =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await;
        let total = self.finish(Query::CountByUser, started_at, result)?;

        Ok((notifications, total))
    }

    async fn mark_as_read(&self, id: i64) -> Result<(), Error> {
        let started_at = Instant::now();
        let result = sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected());

        match self.finish(Query::MarkAsRead, started_at, result)? {
            0 => Err(Error::NotificationNotFound),
            _ => Ok(()),
        }
    }

    async fn mark_all_as_read(&self, user_id: i64) -> Result<u64, Error> {
        let started_at = Instant::now();
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map(|result| result.rows_affected());

        self.finish(Query::MarkAllAsRead, started_at, result)
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        let started_at = Instant::now();
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|result| result.rows_affected());

        match self.finish(Query::Delete, started_at, result)? {
            0 => Err(Error::NotificationNotFound),
            _ => Ok(()),
        }
    }

    async fn count_unread(&self, user_id: i64) -> Result<i64, Error> {
        let started_at = Instant::now();
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await;

        self.finish(Query::CountUnread, started_at, result)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::metrics::mock_metrics_provider;
    use serial_test::serial;
    use sqlx::postgres::PgPoolOptions;
    use time::macros::datetime;

    async fn create_repository() -> NotificationsRepositoryImpl {
        let _ = dotenvy::dotenv();
        let connection_string = std::env::var("TEST_DB_CONNECTION_STRING").unwrap();
        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&connection_string)
            .await
            .unwrap();

        NotificationsRepositoryImpl::new(pool, Arc::new(mock_metrics_provider()))
            .await
            .unwrap()
    }

    fn new_notification(user_id: i64, created_at: OffsetDateTime) -> NewNotification {
        NewNotification {
            user_id,
            notification_type: "follow_created".to_string(),
            created_at: Some(created_at),
            payload: br#"{"follower_id":1,"followee_id":2}"#.to_vec(),
        }
    }

    async fn cleanup(repository: &NotificationsRepositoryImpl, user_id: i64) {
        sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .execute(&repository.pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires running PostgreSQL"]
    async fn created_notification_is_returned_unchanged() {
        let repository = create_repository().await;
        let user_id = 910_001;
        cleanup(&repository, user_id).await;

        let notification = new_notification(user_id, datetime!(2024-05-01 10:00:00.123456 UTC));
        let id = repository.create(notification.clone()).await.unwrap();
        assert!(id > 0);

        let found = repository.get_by_id(id).await.unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.user_id, user_id);
        assert_eq!(found.notification_type, notification.notification_type);
        assert_eq!(found.payload, notification.payload);
        assert_eq!(Some(found.created_at), notification.created_at);
        assert!(!found.is_read);

        cleanup(&repository, user_id).await;
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires running PostgreSQL"]
    async fn list_by_user_is_paginated_newest_first() {
        let repository = create_repository().await;
        let user_id = 910_002;
        cleanup(&repository, user_id).await;

        let older = repository
            .create(new_notification(user_id, datetime!(2024-05-01 10:00 UTC)))
            .await
            .unwrap();
        let newer = repository
            .create(new_notification(user_id, datetime!(2024-05-02 10:00 UTC)))
            .await
            .unwrap();
        let newest = repository
            .create(new_notification(user_id, datetime!(2024-05-03 10:00 UTC)))
            .await
            .unwrap();

        let (page, total) = repository.list_by_user(user_id, 2, 0).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(
            page.iter().map(|n| n.id).collect::<Vec<_>>(),
            vec![newest, newer]
        );

        let (page, total) = repository.list_by_user(user_id, 2, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.iter().map(|n| n.id).collect::<Vec<_>>(), vec![older]);

        let (page, total) = repository.list_by_user(user_id, 2, 10).await.unwrap();
        assert_eq!(total, 3);
        assert!(page.is_empty());

        cleanup(&repository, user_id).await;
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires running PostgreSQL"]
    async fn read_state_transitions() {
        let repository = create_repository().await;
        let user_id = 910_003;
        cleanup(&repository, user_id).await;

        let now = OffsetDateTime::now_utc();
        let first = repository
            .create(new_notification(user_id, now))
            .await
            .unwrap();
        repository
            .create(new_notification(user_id, now))
            .await
            .unwrap();
        assert_eq!(repository.count_unread(user_id).await.unwrap(), 2);

        repository.mark_as_read(first).await.unwrap();
        // idempotent
        repository.mark_as_read(first).await.unwrap();
        assert_eq!(repository.count_unread(user_id).await.unwrap(), 1);

        assert_eq!(repository.mark_all_as_read(user_id).await.unwrap(), 1);
        assert_eq!(repository.mark_all_as_read(user_id).await.unwrap(), 0);
        assert_eq!(repository.count_unread(user_id).await.unwrap(), 0);

        cleanup(&repository, user_id).await;
    }

    #[tokio::test]
    #[serial]
    #[ignore = "requires running PostgreSQL"]
    async fn missing_notification_is_reported_as_not_found() {
        let repository = create_repository().await;
        let user_id = 910_004;
        cleanup(&repository, user_id).await;

        let id = repository
            .create(new_notification(user_id, OffsetDateTime::now_utc()))
            .await
            .unwrap();
        repository.delete(id).await.unwrap();

        assert_eq!(
            repository.get_by_id(id).await,
            Err(Error::NotificationNotFound)
        );
        assert_eq!(
            repository.mark_as_read(id).await,
            Err(Error::NotificationNotFound)
        );
        assert_eq!(repository.delete(id).await, Err(Error::NotificationNotFound));
    }
}
