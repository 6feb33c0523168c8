//! In-memory store implementation for testing.
//!
//! Provides [`MemoryStore`] for unit testing without touching disk or network.

use std::sync::RwLock;

use tracing::debug;
use uuid::Uuid;

use crate::post::{NewPost, Post, PostPatch, listing, now_iso8601};
use crate::store::{PostStore, StoreError};

/// In-memory post store.
///
/// Use the builder methods to seed the store with test data.
///
/// # Example
///
/// ```ignore
/// use inkpost_store::{MemoryStore, NewPost, PostStore};
///
/// let store = MemoryStore::new();
/// let post = store.create(NewPost::new("Hello", "First post"))?;
/// assert_eq!(store.get(&post.id)?, Some(post));
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<Vec<Post>>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a post as-is.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_post(self, post: Post) -> Self {
        self.posts.write().unwrap().push(post);
        self
    }

    /// Number of stored posts, drafts included.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn len(&self) -> usize {
        self.posts.read().unwrap().len()
    }

    /// Returns `true` if the store holds no posts.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PostStore for MemoryStore {
    fn list(&self, include_drafts: bool) -> Result<Vec<Post>, StoreError> {
        Ok(listing(
            self.posts.read().unwrap().iter().cloned(),
            include_drafts,
        ))
    }

    fn get(&self, id: &str) -> Result<Option<Post>, StoreError> {
        Ok(self
            .posts
            .read()
            .unwrap()
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }

    fn create(&self, post: NewPost) -> Result<Post, StoreError> {
        let post = post.into_post(Uuid::new_v4().to_string(), now_iso8601());
        self.posts.write().unwrap().push(post.clone());
        debug!(id = %post.id, "Created post in memory store");
        Ok(post)
    }

    fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        let mut posts = self.posts.write().unwrap();
        let updated = posts.iter_mut().find(|post| post.id == id).map(|post| {
            post.apply(patch);
            post.clone()
        });
        debug!(id, found = updated.is_some(), "Updated post in memory store");
        Ok(updated)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut posts = self.posts.write().unwrap();
        let before = posts.len();
        posts.retain(|post| post.id != id);
        debug!(id, removed = before - posts.len(), "Deleted post from memory store");
        Ok(())
    }
}
