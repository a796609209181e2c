use super::validation;
use crate::{
    dto::{NewNotification, Notification},
    error::Error,
    metrics::MetricsProvider,
    protobuf::notification::{
        notification_service_server::NotificationService, GetNotificationDetailsRequest,
        GetUnreadCountRequest, GetUnreadCountResponse, GetUserNotificationFeedRequest,
        GetUserNotificationFeedResponse, NotificationResponse, ReadAllUserNotificationsRequest,
        ReadNotificationRequest, RemoveNotificationRequest, SendNotificationRequest,
        SendNotificationResponse,
    },
    service::notifications_service::NotificationsService,
};
use std::{future::Future, sync::Arc};
use tokio::time::Instant;
use tonic::{Code, Request, Response, Status};

///
/// `notification.v1.NotificationService` handlers.
///
/// Every handler checks the shape of the request, makes a single
/// service call and converts the outcome to a gRPC response.
///
#[derive(Clone)]
pub struct NotificationsGrpcService {
    notifications_service: Arc<dyn NotificationsService>,
    metrics: Arc<dyn MetricsProvider>,
}

impl NotificationsGrpcService {
    pub fn new(
        notifications_service: Arc<dyn NotificationsService>,
        metrics: Arc<dyn MetricsProvider>,
    ) -> Self {
        Self {
            notifications_service,
            metrics,
        }
    }

    async fn observe<T, F>(&self, method: &'static str, handler: F) -> Result<Response<T>, Status>
    where
        F: Future<Output = Result<T, Error>>,
    {
        let started = Instant::now();
        let result = handler.await.map(Response::new).map_err(Status::from);
        let elapsed = started.elapsed();

        let code = match &result {
            Ok(_) => Code::Ok,
            Err(status) => status.code(),
        };
        let code = format!("{code:?}");
        self.metrics.increment_grpc_requests(method, &code);
        self.metrics
            .record_grpc_request_duration(method, &code, elapsed);
        tracing::info!(method, %code, ?elapsed, "request handled");

        result
    }
}

#[tonic::async_trait]
impl NotificationService for NotificationsGrpcService {
    async fn send_notification(
        &self,
        request: Request<SendNotificationRequest>,
    ) -> Result<Response<SendNotificationResponse>, Status> {
        self.observe("SendNotification", async move {
            let request = request.into_inner();
            validation::validate_send_notification(&request)?;

            let notification = NewNotification {
                user_id: request.user_id,
                notification_type: request.r#type,
                created_at: None,
                payload: request.payload,
            };
            let notification_id = self
                .notifications_service
                .save_notification(notification)
                .await?;

            Ok(SendNotificationResponse { notification_id })
        })
        .await
    }

    async fn get_notification_details(
        &self,
        request: Request<GetNotificationDetailsRequest>,
    ) -> Result<Response<NotificationResponse>, Status> {
        self.observe("GetNotificationDetails", async move {
            let request = request.into_inner();
            validation::validate_get_notification_details(&request)?;

            let notification = self
                .notifications_service
                .get_notification_details(request.notification_id)
                .await?;

            Ok(notification_response(notification))
        })
        .await
    }

    async fn get_user_notification_feed(
        &self,
        request: Request<GetUserNotificationFeedRequest>,
    ) -> Result<Response<GetUserNotificationFeedResponse>, Status> {
        self.observe("GetUserNotificationFeed", async move {
            let request = request.into_inner();
            validation::validate_get_user_notification_feed(&request)?;

            let feed = self
                .notifications_service
                .get_user_notification_feed(request.user_id, request.limit, request.page)
                .await?;

            Ok(GetUserNotificationFeedResponse {
                notifications: feed
                    .notifications
                    .into_iter()
                    .map(notification_response)
                    .collect(),
                total_count: feed.total,
            })
        })
        .await
    }

    async fn read_notification(
        &self,
        request: Request<ReadNotificationRequest>,
    ) -> Result<Response<()>, Status> {
        self.observe("ReadNotification", async move {
            let request = request.into_inner();
            validation::validate_read_notification(&request)?;

            self.notifications_service
                .read_notification(request.notification_id)
                .await
        })
        .await
    }

    async fn read_all_user_notifications(
        &self,
        request: Request<ReadAllUserNotificationsRequest>,
    ) -> Result<Response<()>, Status> {
        self.observe("ReadAllUserNotifications", async move {
            let request = request.into_inner();
            validation::validate_read_all_user_notifications(&request)?;

            self.notifications_service
                .read_all_user_notifications(request.user_id)
                .await
        })
        .await
    }

    async fn remove_notification(
        &self,
        request: Request<RemoveNotificationRequest>,
    ) -> Result<Response<()>, Status> {
        self.observe("RemoveNotification", async move {
            let request = request.into_inner();
            validation::validate_remove_notification(&request)?;

            self.notifications_service
                .remove_notification(request.notification_id)
                .await
        })
        .await
    }

    async fn get_unread_count(
        &self,
        request: Request<GetUnreadCountRequest>,
    ) -> Result<Response<GetUnreadCountResponse>, Status> {
        self.observe("GetUnreadCount", async move {
            let request = request.into_inner();
            validation::validate_get_unread_count(&request)?;

            let count = self
                .notifications_service
                .get_unread_count(request.user_id)
                .await?;

            Ok(GetUnreadCountResponse { count })
        })
        .await
    }
}

fn notification_response(notification: Notification) -> NotificationResponse {
    NotificationResponse {
        id: notification.id,
        user_id: notification.user_id,
        r#type: notification.notification_type,
        is_read: notification.is_read,
        created_at: Some(prost_types::Timestamp {
            seconds: notification.created_at.unix_timestamp(),
            nanos: notification.created_at.nanosecond() as i32,
        }),
        payload: notification.payload,
    }
}
