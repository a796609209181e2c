use crate::repository;
use tonic::Status;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request rejected by gRPC handler before reaching the service
    #[error("validation failed: {0}")]
    Validation(&'static str),

    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    #[error("user not found")]
    UserNotFound,

    #[error("notification not found")]
    NotificationNotFound,

    #[error("database query failed")]
    DatabaseQuery,

    #[error("external service error: {0}")]
    ExternalService(String),

    #[error("unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl From<repository::Error> for Error {
    fn from(err: repository::Error) -> Self {
        match err {
            repository::Error::NotificationNotFound => Error::NotificationNotFound,
            repository::Error::DatabaseQuery => Error::DatabaseQuery,
        }
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        tracing::warn!(%err);

        match err {
            Error::Validation(_) => Status::invalid_argument("validation failed"),
            Error::InvalidInput(_) => Status::invalid_argument("invalid input"),
            Error::UserNotFound => Status::not_found("user not found"),
            Error::NotificationNotFound => Status::not_found("notification not found"),
            Error::DatabaseQuery | Error::ExternalService(_) | Error::Unexpected(_) => {
                Status::internal("internal service error")
            }
        }
    }
}
