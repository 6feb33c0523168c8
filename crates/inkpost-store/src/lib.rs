//! Post storage abstraction for the inkpost blog engine.
//!
//! This crate provides a [`PostStore`] trait for persisting blog posts
//! independently of where they live. This enables:
//!
//! - **Backend flexibility** (local key-value file, hosted REST data API)
//! - **Unit testing** against an in-memory store
//! - **Clean separation** between presentation, rendering and I/O
//!
//! # Architecture
//!
//! The crate provides:
//! - [`PostStore`] trait with `list()`, `get()`, `create()`, `update()` and `delete()`
//! - [`Post`], [`NewPost`] and [`PostPatch`] data types
//! - [`StoreError`] with semantic kinds and retry guidance
//! - [`MemoryStore`] for testing (behind `mock` feature flag)
//!
//! Backends live in `inkpost-store-local` and `inkpost-store-rest`.
//!
//! # Example
//!
//! ```ignore
//! use inkpost_store::{PostStore, format_date};
//!
//! fn print_index(store: &dyn PostStore) -> Result<(), inkpost_store::StoreError> {
//!     for post in store.list(false)? {
//!         println!("{}: {}", format_date(&post.date).unwrap_or_default(), post.title);
//!     }
//!     Ok(())
//! }
//! ```

#[cfg(feature = "mock")]
mod mock;
mod post;
mod store;

#[cfg(feature = "mock")]
pub use mock::MemoryStore;
pub use post::{
    NewPost, Post, PostPatch, format_date, listing, now_iso8601, sort_newest_first,
};
pub use store::{ErrorStatus, PostStore, StoreError, StoreErrorKind};
