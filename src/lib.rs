//! Derive a CIDR subnet from a base prefix, a number of extension bits and a
//! subnet index, each of which may be a `${...}` reference into the
//! request's observed state, desired state or pipeline context.

pub mod config;
pub mod error;
pub mod function;
pub mod models;
pub mod resolver;
pub mod subnet;

pub use config::Config;
pub use error::Error;
pub use function::{get_input, parse_request, Function};
pub use resolver::{resolve_inputs, LookupContext, ResolvedInput};
pub use subnet::compute_subnet;
