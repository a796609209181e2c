use super::UsersService;
use crate::{
    dto::User,
    error::Error,
    protobuf::user::{user_service_client::UserServiceClient, GetUserRequest},
};
use async_trait::async_trait;
use std::time::Duration;
use tonic::{
    transport::{Channel, Endpoint},
    Code,
};

///
/// [UsersService] calling `user.v1.UserService` over gRPC.
///
#[derive(Clone)]
pub struct GrpcUsersService {
    client: UserServiceClient<Channel>,
    timeout: Duration,
}

impl GrpcUsersService {
    ///
    /// Creates client that connects on first call,
    /// so the service can start while user service is down.
    /// `timeout` bounds connecting and every call.
    ///
    pub fn new(url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let channel = Endpoint::from_shared(url.to_owned())?
            .connect_timeout(timeout)
            .timeout(timeout)
            .connect_lazy();

        Ok(Self {
            client: UserServiceClient::new(channel),
            timeout,
        })
    }
}

#[async_trait]
impl UsersService for GrpcUsersService {
    async fn get_user(&self, id: i64) -> Result<User, Error> {
        tracing::debug!(id, "fetching user");

        let mut client = self.client.clone();
        // the endpoint timeout does not cover a stalled HTTP/2 handshake
        let response = tokio::time::timeout(self.timeout, client.get_user(GetUserRequest { id }))
            .await
            .map_err(|_| {
                tracing::error!(id, timeout = ?self.timeout, "user service call timed out");
                Error::ExternalService("user service timed out".to_string())
            })?
            .map_err(|status| match status.code() {
                Code::NotFound => Error::UserNotFound,
                code => {
                    tracing::error!(id, ?code, message = status.message(), "user service call failed");
                    Error::ExternalService(format!("user service returned {code:?}"))
                }
            })?;

        let user = response.into_inner();
        Ok(User {
            id: user.id,
            username: user.username,
            email: user.email,
        })
    }
}
