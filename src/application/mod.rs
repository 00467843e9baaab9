//! Application Layer
//!
//! Use cases that orchestrate transports.
//!
//! - `resolve` - URI to transport factory
//! - `BackupHandler` - fault-proof invocation wrapper returning `bool`
//! - `push_files` - fan files out to several destinations

pub mod handler;
pub mod push;
pub mod resolve;

pub use handler::BackupHandler;
pub use push::{push_files, PushEntry, PushOptions, PushReport};
pub use resolve::{resolve, AnyTransport, Resolver};
