//! Error taxonomy for the designer core.
//!
//! All variants are recoverable and local: the core reports a typed outcome
//! to the caller and never terminates the process. Structural invariant
//! violations (e.g. a connection referencing a device that is no longer in
//! the store) are programming errors and are handled with debug assertions,
//! not with these variants.

use thiserror::Error;

/// Errors reported by the topology store, interaction controller,
/// path resolver, simulation engine and snapshot codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An address field failed syntactic validation. The edit that carried
    /// it is rejected wholesale; no field is partially committed.
    #[error("{field} '{value}' is not valid")]
    Validation { field: &'static str, value: String },

    /// A command referenced a device id that is not in the topology.
    #[error("invalid device '{0}'")]
    InvalidDevice(String),

    /// A connection was requested with the same device at both ends.
    /// Two distinct endpoints per connection is a hard invariant.
    #[error("connection endpoints must be two distinct devices, got '{0}' twice")]
    SelfLoop(String),

    /// A graph query found no route between two devices.
    #[error("no path between {from} and {to}")]
    NoPath { from: String, to: String },

    /// A snapshot document is missing required structure. The load is
    /// aborted and the current topology is left untouched.
    #[error("snapshot format error: {0}")]
    LoadFormat(String),
}
