//! Generic in-memory query cache.
//!
//! This module provides a resource-agnostic caching mechanism that:
//! - Runs at most one current fetch per key
//! - Keeps results fresh for a fixed window, then refetches on the next read
//! - Serves the last good data while a refetch is in flight or after it failed
//! - Invalidates single keys or whole key families

mod layer;
mod traits;

pub use layer::QueryCache;
pub use traits::QueryKey;
