//! Error kinds raised while resolving inputs and computing subnets.
//!
//! Every kind is terminal. Call boundaries add a stage message with
//! [`anyhow::Context`]; use [`anyhow::Error::downcast_ref`] to get the kind back.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{namespace} is not a supported lookup, expected one of [{}]", expected.join(", "))]
    UnsupportedNamespace {
        namespace: String,
        expected: Vec<String>,
    },

    #[error("failed to parse fieldpath {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("no value found at {path}")]
    FieldNotFound { path: String },

    #[error("value at {path} is {found}, expected {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid prefix {prefix}: {reason}")]
    InvalidPrefix { prefix: String, reason: String },

    #[error("not enough space to extend prefix {prefix} by {newbits} bits")]
    InsufficientAddressSpace { prefix: String, newbits: i64 },

    #[error("netnum {netnum} is greater than maximum allowed for {newbits} newbits")]
    NetnumOutOfRange { netnum: i64, newbits: i64 },

    #[error("{name} must not be negative, got {value}")]
    NegativeOperand { name: &'static str, value: i64 },

    #[error("invalid input at {path}: {reason}")]
    InvalidInput { path: String, reason: String },
}
