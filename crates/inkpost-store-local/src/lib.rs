//! Local key-value file backend for inkpost.
//!
//! This crate provides [`LocalStore`], an implementation of the
//! [`PostStore`](inkpost_store::PostStore) trait that keeps every post in a
//! single JSON key-value file on disk:
//!
//! - Posts are serialized as one JSON array under the `posts` key
//! - A missing file is an empty store
//! - Every mutation rewrites the file atomically
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use inkpost_store::{NewPost, PostStore};
//! use inkpost_store_local::LocalStore;
//!
//! let store = LocalStore::new(PathBuf::from(".inkpost/posts.json"));
//! let post = store.create(NewPost::new("Hello", "First post").published(true))?;
//! for post in store.list(false)? {
//!     println!("{}: {}", post.id, post.title);
//! }
//! ```

mod kv;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use inkpost_store::{NewPost, Post, PostPatch, PostStore, StoreError, listing, now_iso8601};
use uuid::Uuid;

use kv::KeyValueFile;

/// Backend identifier for error messages.
const BACKEND: &str = "Local";

/// Key holding the serialized post list.
const POSTS_KEY: &str = "posts";

/// Post store backed by a local key-value file.
#[derive(Debug)]
pub struct LocalStore {
    file: KeyValueFile,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl LocalStore {
    /// Create a store over the given file. The file is created on first write.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: KeyValueFile::new(path),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, so a poisoned lock carries no broken state.
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read_posts(&self) -> Result<Vec<Post>, StoreError> {
        match self.file.get_item(POSTS_KEY)? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| StoreError::json(e).with_backend(BACKEND)),
            None => Ok(Vec::new()),
        }
    }

    fn write_posts(&self, posts: &[Post]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(posts)
            .map_err(|e| StoreError::json(e).with_backend(BACKEND))?;
        self.file.set_item(POSTS_KEY, raw)
    }
}

impl PostStore for LocalStore {
    fn list(&self, include_drafts: bool) -> Result<Vec<Post>, StoreError> {
        let posts = self.read_posts()?;
        tracing::debug!(total = posts.len(), include_drafts, "Listing local posts");
        Ok(listing(posts, include_drafts))
    }

    fn get(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.read_posts()?.into_iter().find(|post| post.id == id))
    }

    fn create(&self, post: NewPost) -> Result<Post, StoreError> {
        let _guard = self.lock();
        let mut posts = self.read_posts()?;
        let post = post.into_post(Uuid::new_v4().to_string(), now_iso8601());
        posts.push(post.clone());
        self.write_posts(&posts)?;

        tracing::info!(id = %post.id, title = %post.title, "Created post");
        Ok(post)
    }

    fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        let _guard = self.lock();
        let mut posts = self.read_posts()?;
        let Some(post) = posts.iter_mut().find(|post| post.id == id) else {
            tracing::debug!(id, "Update skipped, post not found");
            return Ok(None);
        };
        post.apply(patch);
        let updated = post.clone();
        self.write_posts(&posts)?;

        tracing::info!(id, "Updated post");
        Ok(Some(updated))
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.lock();
        let mut posts = self.read_posts()?;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() != before {
            self.write_posts(&posts)?;
            tracing::info!(id, "Deleted post");
        }
        Ok(())
    }
}
