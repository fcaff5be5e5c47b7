//! HTTP handlers for the feed mill API

mod composition;
mod feed;
mod health;

pub use composition::*;
pub use feed::*;
pub use health::*;
