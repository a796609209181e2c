mod dto;
mod events_processor;
mod events_queue;
mod notifications_consumer_service;
mod notifications_consumer_service_config;

pub use events_processor::*;
pub use events_queue::*;
pub use notifications_consumer_service::*;
pub use notifications_consumer_service_config::*;
