pub mod notifications_consumer_service;
pub mod notifications_service;
pub mod users_service;
