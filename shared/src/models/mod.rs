//! Domain models for the feed mill

mod composition;
mod feed;

pub use composition::*;
pub use feed::*;
