//! Shared types for the shift scheduling system
//!
//! Domain records (employees, shifts), the shift-type classifier, solver wire
//! messages, validation errors and the logging bootstrap used by every binary.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use messages::*;
pub use types::*;
