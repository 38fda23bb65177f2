//! Subnet arithmetic.
//!
//! - [`calc`] - Extend a prefix by `newbits` and select subnet `netnum`

mod calc;

pub use calc::{carve, compute_subnet, extend_prefix, parse_prefix};
