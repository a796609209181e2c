//!
//! Code generated from `proto/`
//!

pub mod notification {
    tonic::include_proto!("notification.v1");
}

pub mod user {
    tonic::include_proto!("user.v1");
}
