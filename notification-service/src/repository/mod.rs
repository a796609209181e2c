mod error;
#[cfg(test)]
mod in_memory_notifications_repository;
mod notifications_repository;
mod notifications_repository_impl;

pub use error::*;
#[cfg(test)]
pub use in_memory_notifications_repository::*;
pub use notifications_repository::*;
pub use notifications_repository_impl::*;
