//! Error types for the LLC tank sweep.
//!
//! [`LlcError`] only covers malformed input and I/O at the outer surface.
//! Numerical trouble inside a sweep (a corner with no reachable gain, an
//! unbracketed root) is reported as data on the candidate, never as an error.

use thiserror::Error;

/// Result type alias using [`LlcError`].
pub type Result<T> = std::result::Result<T, LlcError>;

/// Unified error type for all sweep operations.
#[derive(Error, Debug)]
pub enum LlcError {
    // ============ Specification Errors ============
    /// A scalar field of the design spec is out of its physical domain
    #[error("Invalid design spec field '{field}': {message}")]
    InvalidSpec { field: String, message: String },

    /// A sweep range or acceptable window is malformed
    #[error("Invalid range '{name}': {message}")]
    InvalidRange { name: String, message: String },

    /// The grid produced no (Ln, Qe) pairs
    #[error("Sweep grid is empty - check the Ln/Qe ranges and resolution")]
    EmptySweep,

    // ============ I/O Errors ============
    /// Error reading a spec file
    #[error("Failed to read spec file '{path}': {source}")]
    SpecReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error decoding a spec document
    #[error("Failed to parse spec: {message}")]
    SpecParseError { message: String },

    /// Error encoding results
    #[error("Failed to serialize results: {message}")]
    SerializeError { message: String },
}

impl LlcError {
    /// Create an invalid spec field error
    pub fn invalid_spec(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSpec {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid range error
    pub fn invalid_range(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRange {
            name: name.into(),
            message: message.into(),
        }
    }
}
