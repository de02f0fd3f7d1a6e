//! Bounded stream module
//!
//! Provides a forward-only reader over a fixed byte range of a shared
//! random-access source, plus the source abstraction it reads through.

mod bounded;
mod error;
mod source;

pub use bounded::{BoundedReader, StreamState};
pub use error::{Result, StreamError};
pub use source::{MemorySource, SharedSource, SynchronizedSource};
