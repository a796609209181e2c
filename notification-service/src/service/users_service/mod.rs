mod grpc_users_service;
mod users_service;

pub use grpc_users_service::*;
pub use users_service::*;
