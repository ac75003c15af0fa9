pub mod emoji_resolver;
pub mod message_filter;

pub use emoji_resolver::*;
pub use message_filter::*;
