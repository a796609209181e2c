//!
//! RabbitMQ client that survives broker restarts.
//!
//! [RabbitmqConnection] keeps a single AMQP connection alive and
//! [RabbitmqConsumer] exposes a pull-style consumer on top of it:
//! deliveries are polled one by one and committed explicitly.
//!

pub mod connection;
pub mod consumer;
mod retry;

pub use connection::{RabbitmqConnection, RabbitmqConnectionConfig};
pub use consumer::{Delivery, PollError, RabbitmqConsumer, Subscription};
