#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("notification not found")]
    NotificationNotFound,

    #[error("database query failed")]
    DatabaseQuery,
}
