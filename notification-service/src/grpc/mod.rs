mod notifications_grpc_service;
mod validation;

pub use notifications_grpc_service::*;
