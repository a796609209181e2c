//!
//! Pull-style consumer.
//!
//! Deliveries pushed by the broker are buffered (at most `prefetch_count`
//! of them) and handed out one at a time by [RabbitmqConsumer::poll].
//! Without auto ack every delivery stays unacknowledged on the broker
//! until [Delivery::commit] is called.
//!

mod channel_callback;
mod delivery;
mod delivery_forwarder;
mod error;
mod rabbitmq_consumer;
mod state_machine;
mod subscription;

pub use delivery::Delivery;
pub use error::PollError;
pub use rabbitmq_consumer::RabbitmqConsumer;
pub use subscription::Subscription;
