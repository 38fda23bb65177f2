//! Domain models for the cidr subnet function.
//!
//! This module contains the data structures exchanged with the pipeline:
//! - [`Document`] - Decoded tree-shaped document values
//! - [`Input`] and [`IntOrString`] - The extension spec
//! - [`RunFunctionRequest`] and [`RunFunctionResponse`] - Request/response envelope

mod document;
mod input;
mod request;

// Re-export public types
pub use document::Document;
pub use input::{Input, IntOrString, ObjectMeta};
pub use request::{
    FunctionResult, RequestMeta, Resource, ResponseMeta, RunFunctionRequest,
    RunFunctionResponse, Severity, State,
};
