use serde::Deserialize;
use serde_json::value::RawValue;

///
/// Every message published to the events exchange.
/// Payload is kept as raw JSON until event type is known.
///
#[derive(Debug, Deserialize)]
pub struct EventEnvelope {
    pub event_type: String,
    pub payload: Box<RawValue>,
}
