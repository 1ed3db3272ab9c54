//! CLI command implementations.

pub mod replay;
pub mod schema;
