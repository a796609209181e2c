use super::dto::{EventEnvelope, EventType, FollowCreatedPayload};
use crate::{
    dto::NewNotification, error::Error,
    service::notifications_service::NotificationsService,
};
use std::{str::FromStr, sync::Arc};

/// Reason of [Error::InvalidInput] for events this service doesn't handle
pub const UNKNOWN_EVENT_TYPE: &str = "unknown event type";

///
/// Turns raw queue messages into saved notifications.
///
#[derive(Clone)]
pub struct EventsProcessor {
    notifications_service: Arc<dyn NotificationsService>,
}

impl EventsProcessor {
    pub fn new(notifications_service: Arc<dyn NotificationsService>) -> Self {
        Self {
            notifications_service,
        }
    }

    ///
    /// Decodes the envelope, maps known event to notification and saves it.
    ///
    /// ### Returns
    /// ID of saved notification
    ///
    /// ### Errors
    /// - [Error::InvalidInput] when
    ///     - message is not a valid envelope
    ///     - event type is unknown
    ///     - payload doesn't match event type
    /// - any error returned by [NotificationsService::save_notification]
    ///
    pub async fn process(&self, content: &[u8]) -> Result<i64, Error> {
        let envelope = serde_json::from_slice::<EventEnvelope>(content).map_err(|err| {
            tracing::debug!(%err, "failed to decode envelope");
            Error::InvalidInput("malformed event envelope")
        })?;

        let event_type = EventType::from_str(&envelope.event_type).map_err(|_| {
            tracing::warn!(event_type = %envelope.event_type, "unknown event type");
            Error::InvalidInput(UNKNOWN_EVENT_TYPE)
        })?;
        tracing::info!(event_type = <&'static str>::from(event_type), "decoded event");

        let notification = match event_type {
            EventType::FollowCreated => Self::follow_created_notification(&envelope)?,
        };

        self.notifications_service
            .save_notification(notification)
            .await
    }

    fn follow_created_notification(envelope: &EventEnvelope) -> Result<NewNotification, Error> {
        let payload = serde_json::from_str::<FollowCreatedPayload>(envelope.payload.get())
            .map_err(|err| {
                tracing::debug!(%err, "failed to decode follow_created payload");
                Error::InvalidInput("malformed follow_created payload")
            })?;

        if payload.follower_id <= 0 {
            return Err(Error::InvalidInput("follower_id must be positive"));
        }
        if payload.followee_id <= 0 {
            return Err(Error::InvalidInput("followee_id must be positive"));
        }

        Ok(NewNotification {
            user_id: payload.followee_id,
            notification_type: <&'static str>::from(EventType::FollowCreated).to_string(),
            created_at: None,
            payload: envelope.payload.get().as_bytes().to_vec(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        dto::User,
        metrics::mock_metrics_provider,
        repository::InMemoryNotificationsRepository,
        service::{
            notifications_service::{MockNotificationsService, NotificationsServiceImpl},
            users_service::MockUsersService,
        },
    };

    fn processor(notifications_service: MockNotificationsService) -> EventsProcessor {
        EventsProcessor::new(Arc::new(notifications_service))
    }

    #[tokio::test]
    async fn follow_created_saved_for_followee() {
        let mut notifications_service = MockNotificationsService::new();
        notifications_service
            .expect_save_notification()
            .withf(|notification| {
                notification.user_id == 42
                    && notification.notification_type == "follow_created"
                    && notification.payload == br#"{"follower_id":7,"followee_id":42}"#
            })
            .return_once(|_| Ok(5));

        let result = processor(notifications_service)
            .process(br#"{"event_type":"follow_created","payload":{"follower_id":7,"followee_id":42}}"#)
            .await;

        assert!(matches!(result, Ok(5)));
    }

    #[tokio::test]
    async fn payload_bytes_stored_as_received() {
        let mut notifications_service = MockNotificationsService::new();
        notifications_service
            .expect_save_notification()
            .withf(|notification| {
                notification.payload == br#"{ "followee_id": 42,  "follower_id": 7 }"#
            })
            .return_once(|_| Ok(1));

        let result = processor(notifications_service)
            .process(
                br#"{"payload":{ "followee_id": 42,  "follower_id": 7 },"event_type":"follow_created"}"#,
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn unknown_event_type_rejected_without_saving() {
        let result = processor(MockNotificationsService::new())
            .process(br#"{"event_type":"post_liked","payload":{"post_id":1}}"#)
            .await;

        assert!(matches!(result, Err(Error::InvalidInput(UNKNOWN_EVENT_TYPE))));
    }

    #[tokio::test]
    async fn follow_created_not_positive_ids_rejected_without_saving() {
        let messages: [&[u8]; 4] = [
            br#"{"event_type":"follow_created","payload":{"follower_id":7,"followee_id":0}}"#,
            br#"{"event_type":"follow_created","payload":{"follower_id":0,"followee_id":42}}"#,
            br#"{"event_type":"follow_created","payload":{"follower_id":-1,"followee_id":42}}"#,
            br#"{"event_type":"follow_created","payload":{"follower_id":7,"followee_id":-3}}"#,
        ];

        for message in messages {
            let result = processor(MockNotificationsService::new())
                .process(message)
                .await;

            assert!(matches!(result, Err(Error::InvalidInput(_))));
        }
    }

    #[tokio::test]
    async fn malformed_messages_rejected_without_saving() {
        let messages: [&[u8]; 5] = [
            b"",
            b"not json",
            br#"{"payload":{"follower_id":7,"followee_id":42}}"#,
            br#"{"event_type":"follow_created"}"#,
            br#"{"event_type":"follow_created","payload":{"follower_id":7}}"#,
        ];

        for message in messages {
            let result = processor(MockNotificationsService::new())
                .process(message)
                .await;

            assert!(matches!(result, Err(Error::InvalidInput(reason)) if reason != UNKNOWN_EVENT_TYPE));
        }
    }

    #[tokio::test]
    async fn service_error_returned() {
        let mut notifications_service = MockNotificationsService::new();
        notifications_service
            .expect_save_notification()
            .return_once(|_| Err(Error::UserNotFound));

        let result = processor(notifications_service)
            .process(br#"{"event_type":"follow_created","payload":{"follower_id":7,"followee_id":42}}"#)
            .await;

        assert!(matches!(result, Err(Error::UserNotFound)));
    }

    #[tokio::test]
    async fn follow_created_event_becomes_unread_notification() {
        let mut users_service = MockUsersService::new();
        users_service.expect_get_user().returning(|id| {
            Ok(User {
                id,
                username: "followee".to_string(),
                email: "followee@example.com".to_string(),
            })
        });
        let notifications_service = Arc::new(NotificationsServiceImpl::new(
            Arc::new(InMemoryNotificationsRepository::default()),
            Arc::new(users_service),
            Arc::new(mock_metrics_provider()),
        ));
        let processor = EventsProcessor::new(notifications_service.clone());

        let id = processor
            .process(br#"{"event_type":"follow_created","payload":{"follower_id":7,"followee_id":42}}"#)
            .await
            .unwrap();

        let notification = notifications_service
            .get_notification_details(id)
            .await
            .unwrap();
        assert_eq!(notification.user_id, 42);
        assert_eq!(notification.notification_type, "follow_created");
        assert!(!notification.is_read);
        assert!(notifications_service.get_unread_count(42).await.unwrap() >= 1);
    }
}
