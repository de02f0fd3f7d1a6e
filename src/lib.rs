//! Ranged Stream Library
//!
//! Sequential, range-limited reading over shared random-access sources.

pub mod config;
pub mod stream;

pub use stream::{
    BoundedReader, MemorySource, SharedSource, StreamError, StreamState, SynchronizedSource,
};
