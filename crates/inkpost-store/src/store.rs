//! Post store trait and error types.
//!
//! Provides the core [`PostStore`] trait for persisting posts, along with
//! [`StoreError`] for unified error handling across backends.

use crate::post::{NewPost, Post, PostPatch};

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Credentials missing or rejected.
    PermissionDenied,
    /// Stored or received data could not be decoded.
    InvalidData,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Too many requests.
    RateLimited,
    /// Operation timed out.
    Timeout,
    /// Other/unknown error category.
    Other,
}

/// Retry guidance.
#[derive(Debug, PartialEq, Eq, Default)]
pub enum ErrorStatus {
    /// Don't retry (config error, not found, bad data).
    #[default]
    Permanent,
    /// Retry immediately (timeout, connection reset).
    Temporary,
    /// Retry with backoff (rate limited, service unavailable).
    Persistent,
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Retry guidance.
    pub status: ErrorStatus,
    /// Post id context (if applicable).
    pub id: Option<String>,
    /// Backend identifier (e.g., "Local", "Rest").
    pub backend: Option<&'static str>,
    /// Human-readable detail (e.g., an HTTP error body).
    pub detail: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            status: ErrorStatus::Permanent,
            id: None,
            backend: None,
            detail: None,
            source: None,
        }
    }

    /// Attach post id context.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Set retry status.
    #[must_use]
    pub fn with_status(mut self, status: ErrorStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach a human-readable detail message.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a store error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StoreErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StoreErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => StoreErrorKind::Timeout,
            std::io::ErrorKind::InvalidData => StoreErrorKind::InvalidData,
            _ => StoreErrorKind::Other,
        };
        let status = match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted => {
                ErrorStatus::Temporary
            }
            _ => ErrorStatus::Permanent,
        };
        Self::new(kind).with_status(status).with_source(err)
    }

    /// Create a store error from a JSON encoding or decoding error.
    #[must_use]
    pub fn json(err: serde_json::Error) -> Self {
        Self::new(StoreErrorKind::InvalidData).with_source(err)
    }

    /// Create a store error from an unsuccessful HTTP status.
    #[must_use]
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        let (kind, retry) = match status {
            404 => (StoreErrorKind::NotFound, ErrorStatus::Permanent),
            401 | 403 => (StoreErrorKind::PermissionDenied, ErrorStatus::Permanent),
            408 => (StoreErrorKind::Timeout, ErrorStatus::Temporary),
            429 => (StoreErrorKind::RateLimited, ErrorStatus::Persistent),
            500..=599 => (StoreErrorKind::Unavailable, ErrorStatus::Persistent),
            _ => (StoreErrorKind::Other, ErrorStatus::Permanent),
        };
        Self::new(kind)
            .with_status(retry)
            .with_detail(format!("HTTP {status}: {}", body.into()))
    }

    /// Returns `true` if retrying the operation may succeed.
    pub fn is_retryable(&self) -> bool {
        self.status != ErrorStatus::Permanent
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: detail: source (id: abc)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::PermissionDenied => "Permission denied",
            StoreErrorKind::InvalidData => "Invalid data",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::RateLimited => "Rate limited",
            StoreErrorKind::Timeout => "Timeout",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(id) = &self.id {
            write!(f, " (id: {id})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Persistence for blog posts.
///
/// Implementations own their connection or file handles and are shared
/// across threads. The renderer never depends on this trait; presentation
/// code fetches a post and renders its body.
pub trait PostStore: Send + Sync {
    /// List posts, newest first.
    ///
    /// Drafts are excluded unless `include_drafts` is set.
    fn list(&self, include_drafts: bool) -> Result<Vec<Post>, StoreError>;

    /// Fetch one post by id. Returns `Ok(None)` if it does not exist.
    fn get(&self, id: &str) -> Result<Option<Post>, StoreError>;

    /// Create a post. The store assigns the id and stamps the current time.
    fn create(&self, post: NewPost) -> Result<Post, StoreError>;

    /// Apply a partial update. Returns `Ok(None)` if the post does not exist.
    fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, StoreError>;

    /// Delete a post. Deleting a missing post is not an error.
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}
