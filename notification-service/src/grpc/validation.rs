use crate::{
    error::Error,
    protobuf::notification::{
        GetNotificationDetailsRequest, GetUnreadCountRequest, GetUserNotificationFeedRequest,
        ReadAllUserNotificationsRequest, ReadNotificationRequest, RemoveNotificationRequest,
        SendNotificationRequest,
    },
};

pub const MAX_FEED_LIMIT: i32 = 100;

pub fn validate_send_notification(request: &SendNotificationRequest) -> Result<(), Error> {
    validate_user_id(request.user_id)?;
    if request.r#type.is_empty() {
        return Err(Error::Validation("type is empty"));
    }
    if request.payload.is_empty() {
        return Err(Error::Validation("payload is empty"));
    }

    Ok(())
}

pub fn validate_get_notification_details(
    request: &GetNotificationDetailsRequest,
) -> Result<(), Error> {
    validate_notification_id(request.notification_id)
}

///
/// Zero limit and page are accepted, service replaces them with defaults
///
pub fn validate_get_user_notification_feed(
    request: &GetUserNotificationFeedRequest,
) -> Result<(), Error> {
    validate_user_id(request.user_id)?;
    if !(0..=MAX_FEED_LIMIT).contains(&request.limit) {
        return Err(Error::Validation("limit must be between 0 and 100"));
    }
    if request.page < 0 {
        return Err(Error::Validation("page is negative"));
    }

    Ok(())
}

pub fn validate_read_notification(request: &ReadNotificationRequest) -> Result<(), Error> {
    validate_notification_id(request.notification_id)
}

pub fn validate_read_all_user_notifications(
    request: &ReadAllUserNotificationsRequest,
) -> Result<(), Error> {
    validate_user_id(request.user_id)
}

pub fn validate_remove_notification(request: &RemoveNotificationRequest) -> Result<(), Error> {
    validate_notification_id(request.notification_id)
}

pub fn validate_get_unread_count(request: &GetUnreadCountRequest) -> Result<(), Error> {
    validate_user_id(request.user_id)
}

fn validate_user_id(user_id: i64) -> Result<(), Error> {
    match user_id > 0 {
        true => Ok(()),
        false => Err(Error::Validation("user_id must be positive")),
    }
}

fn validate_notification_id(notification_id: i64) -> Result<(), Error> {
    match notification_id > 0 {
        true => Ok(()),
        false => Err(Error::Validation("notification_id must be positive")),
    }
}
