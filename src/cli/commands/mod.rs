//! CLI command implementations.

pub mod dump;
pub mod show;
pub mod validate;
