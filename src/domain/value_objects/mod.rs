//! Domain Value Objects
//!
//! Immutable value types that describe a backup destination and the result of
//! a transfer.

mod destination;
mod outcome;
mod query;
mod scheme;
mod script;

pub use destination::Destination;
pub use outcome::TransferOutcome;
pub use query::{parse_flag, OptionDecoder, QueryOptions};
pub use scheme::Scheme;
pub use script::{remote_join, ScriptTemplate, DESTINATION_PLACEHOLDER};
