//! Concurrent in-memory sorted index with a dict-like API.
//!
//! This crate provides a single-level bucketed index mapping ordered keys to
//! 64-bit record identifiers. It supports point lookup, ordered range scans,
//! insertion with duplicate keys and deletion, and splits buckets automatically
//! as data grows. It is meant to back a storage engine's secondary index.
//!
//! ```
//! use bucket_index::BucketIndex;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let index = Arc::new(BucketIndex::new(32).unwrap());
//! let writers: Vec<_> = (0..4u64)
//!     .map(|t| {
//!         let index = Arc::clone(&index);
//!         thread::spawn(move || {
//!             for i in 0..100 {
//!                 index.insert(t * 100 + i, t * 100 + i).unwrap();
//!             }
//!         })
//!     })
//!     .collect();
//! for writer in writers {
//!     writer.join().unwrap();
//! }
//!
//! assert_eq!(index.len(), 400);
//! assert_eq!(index.search(&250).unwrap(), 250);
//! ```

mod arena;
mod bucket;
mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod keys;
mod locator;
mod range_queries;
mod types;
mod validation;

pub use arena::ArenaStats;
pub use construction::{validation as threshold, DEFAULT_THRESHOLD};
pub use error::{
    CallbackError, IndexError, IndexResult, IndexResultExt, InitResult, RangeBound,
};
pub use keys::{OrderedF32, OrderedF64};
pub use types::{BucketIndex, RecordId, MAX_THRESHOLD, MIN_THRESHOLD};
