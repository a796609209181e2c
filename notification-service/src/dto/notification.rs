use time::OffsetDateTime;

///
/// Notification that has not been persisted yet, so it has no id.
/// Always stored as unread.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: i64,
    pub notification_type: String,
    /// Filled with current time when missing
    pub created_at: Option<OffsetDateTime>,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: String,
    pub is_read: bool,
    pub created_at: OffsetDateTime,
    /// Opaque bytes, returned exactly as they were saved
    pub payload: Vec<u8>,
}
