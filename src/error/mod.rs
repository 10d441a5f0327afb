//! Error handling
//!
//! Defines error types for the authentication adapter.

pub mod types;

pub use types::*;
