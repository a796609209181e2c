use crate::{dto::User, error::Error};
use async_trait::async_trait;

///
/// User directory.
///
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersService: Send + Sync {
    ///
    /// ### Errors
    /// - [Error::UserNotFound] when user does not exist
    /// - [Error::ExternalService] when user directory can't be reached
    ///
    async fn get_user(&self, id: i64) -> Result<User, Error>;
}
