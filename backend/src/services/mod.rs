//! Business logic services for the feed mill server

pub mod composition;
pub mod feed;

pub use composition::CompositionService;
pub use feed::FeedService;
