//! I/O utilities for loading the chat log and the emote table.
//!
//! This module reads the comma-separated source files into the in-memory
//! dataset and provides the datetime parsing shared by the loader and the
//! filter inputs.

pub mod csv_loader;
pub mod datetime;

// Re-export commonly used types and functions
pub use csv_loader::{
    load_emotes, load_messages, read_emotes, read_messages, LoadError, LoadedMessages,
};
pub use datetime::{parse_range_bound, parse_timestamp, BoundKind};
