//! # Tagweave Cache
//!
//! A small associative store that fills itself on demand.
//!
//! [`KeyedCache`] maps keys to values in insertion order. Reading a key that
//! is not present runs a configurable miss handler, stores what it returns
//! and hands the value back, so subsequent reads are plain lookups. The
//! default handler fails with [`CacheError::NotFound`].
//!
//! Every tag node in `tagweave-core` owns two of these: one for attributes
//! and one for metadata.
//!
//! ## Example
//!
//! ```
//! use tagweave_cache::KeyedCache;
//!
//! let cache: KeyedCache<String, usize> = KeyedCache::with_on_missing(|key: &String| Ok(key.len()));
//! assert_eq!(cache.get(&"four".to_string()).unwrap(), 4);
//! assert!(cache.has(&"four".to_string()));
//! ```

mod error;
mod keyed;

pub use error::{CacheError, CacheResult};
pub use keyed::{KeyedCache, MissHandler};
