//! Feed composition editor client
//!
//! Holds one operator's editing session over the mill's feed compositions:
//! pick a composition, stage member changes, watch the running total and
//! commit the whole member list back in one call. Persistence goes through
//! the [`CompositionStore`] port, backed either by the REST API
//! ([`HttpCompositionStore`]) or by memory ([`InMemoryCompositionStore`]).

pub mod config;
pub mod editor;
pub mod error;
pub mod store;

pub use config::ClientConfig;
pub use editor::{CompositionEditor, EditorMode, ModeKind};
pub use error::{ClientError, ClientResult};
pub use store::{CompositionStore, HttpCompositionStore, InMemoryCompositionStore};
