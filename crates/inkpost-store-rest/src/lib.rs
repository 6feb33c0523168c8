//! Hosted REST data API backend for inkpost.
//!
//! This crate provides [`RestStore`], an implementation of the
//! [`PostStore`](inkpost_store::PostStore) trait over a PostgREST-style
//! endpoint such as Supabase:
//!
//! - Rows live in a table exposed at `{base_url}/rest/v1/{table}`
//! - Requests authenticate with an API key (`apikey` + bearer token)
//! - Filtering and ordering happen server-side (`published=eq.true`, `order=date.desc`)
//! - Writes ask for `Prefer: return=representation` to get the stored row back
//!
//! All calls are blocking.
//!
//! # Example
//!
//! ```ignore
//! use inkpost_store::PostStore;
//! use inkpost_store_rest::RestStore;
//!
//! let store = RestStore::new("https://project.supabase.co", "publishable-key");
//! for post in store.list(false)? {
//!     println!("{}: {}", post.id, post.title);
//! }
//! ```

mod client;
mod posts;

pub use client::{DEFAULT_TABLE, DEFAULT_TIMEOUT, RestStore};
