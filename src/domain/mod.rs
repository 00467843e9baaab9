//! Domain Layer
//!
//! Destination parsing and the transport contract, free of network and
//! process I/O.
//!
//! ## Structure
//!
//! - `value_objects/` - Destination, Scheme, QueryOptions, TransferOutcome
//! - `ports/` - The `Transport` trait implemented by infrastructure

pub mod ports;
pub mod value_objects;
