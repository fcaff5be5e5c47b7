//! Shared types and models for the feed mill composition tooling
//!
//! This crate contains types shared between the backend, the editor client,
//! the browser bindings (via WASM) and other components of the system.

pub mod draft;
pub mod models;
pub mod types;
pub mod validation;

pub use draft::*;
pub use models::*;
pub use types::*;
pub use validation::*;
