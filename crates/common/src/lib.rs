//! Poster Studio Common Utilities
//!
//! Shared infrastructure for all Poster Studio crates:
//! - Error types and result aliases
//! - Tracing/logging initialization
//! - Configuration loading
//! - Aspect modes, shared by configuration and the poster model

pub mod aspect;
pub mod config;
pub mod error;
pub mod logging;

pub use aspect::*;
pub use config::*;
pub use error::*;
