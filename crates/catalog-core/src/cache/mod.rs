//! Tagged list cache.
//!
//! List reads are served from memory until a mutation invalidates the tag of
//! the entity kind it touched, or until the TTL elapses.

mod list;

pub use list::{CacheStats, ListCache};
