#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PollError {
    #[error("no delivery received before poll timeout")]
    Timeout,

    #[error("consumer closed")]
    Closed,
}
