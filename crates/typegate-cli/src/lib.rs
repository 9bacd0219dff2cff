//! # typegate-cli — terminal consumer of the validation engine
//!
//! Subcommand handlers live here; `main.rs` only parses arguments and
//! dispatches. Every subcommand builds the same engine the API service
//! uses, so CLI results match server results exactly.

pub mod context;
pub mod schema;
pub mod types;
pub mod validate;

pub use context::ClientOptions;
