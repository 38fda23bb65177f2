//! Reference resolution.
//!
//! Inputs may be literals or `${<path>}` references into the lookup context:
//! - [`path`] - Field path parsing and document walking
//! - [`lookup`] - Namespace routing and typed resolution
//! - [`inputs`] - Resolving a whole [`crate::models::Input`]

mod inputs;
mod lookup;
mod path;

// Re-export public types and functions
pub use inputs::{resolve_inputs, ResolvedInput};
pub use lookup::{LookupContext, Namespace, Resolved};
pub use path::{walk, FieldPath, Segment};
