mod event_envelope;
mod event_type;
mod follow_created_payload;

pub use event_envelope::*;
pub use event_type::*;
pub use follow_created_payload::*;
