//! Post data model and helpers shared by store backends.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

/// A blog post.
///
/// `date` is an ISO-8601 timestamp string, kept as written by the backend so
/// that posts round-trip unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Backend-assigned identifier.
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// Post title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Creation timestamp (ISO-8601).
    pub date: String,
    /// Whether the post is publicly listed.
    pub published: bool,
}

impl Post {
    /// Returns `true` if the post is not published.
    pub fn is_draft(&self) -> bool {
        !self.published
    }

    /// Apply a partial update. Absent fields are left unchanged.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(published) = patch.published {
            self.published = published;
        }
    }
}

/// Fields for creating a post. The store assigns `id` and `date`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Markdown body.
    pub body: String,
    /// Publish immediately (defaults to draft).
    pub published: bool,
}

impl NewPost {
    /// Create a draft post.
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            published: false,
        }
    }

    /// Set the published flag.
    #[must_use]
    pub fn published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Build the stored post from this request.
    pub fn into_post(self, id: String, date: String) -> Post {
        Post {
            id,
            title: self.title,
            body: self.body,
            date,
            published: self.published,
        }
    }
}

/// Partial update for a post. `None` fields are left unchanged and are not
/// serialized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl PostPatch {
    /// Returns `true` if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.date.is_none() && self.published.is_none()
    }
}

/// Hosted APIs commonly use integer keys; local backends use UUID strings.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Sort posts by date, newest first.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

/// Select the posts a listing shows: drafts only when requested, newest first.
pub fn listing(posts: impl IntoIterator<Item = Post>, include_drafts: bool) -> Vec<Post> {
    let posts = posts.into_iter();
    let mut listed = Vec::with_capacity(posts.size_hint().0);
    let mut hidden = 0usize;
    for post in posts {
        if include_drafts || post.published {
            listed.push(post);
        } else {
            hidden += 1;
        }
    }
    sort_newest_first(&mut listed);

    debug!(listed = listed.len(), hidden, include_drafts, "Selected posts for listing");
    listed
}

/// Current UTC time as ISO-8601 with millisecond precision, e.g.
/// `2026-10-16T09:30:00.000Z`.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Format an ISO-8601 timestamp for display, e.g. `October 16, 2026`.
///
/// The date is taken in the timestamp's own offset. Returns `None` if the
/// input is not a recognizable date.
///
/// # Examples
///
/// ```
/// use inkpost_store::format_date;
///
/// assert_eq!(format_date("2026-10-06T09:30:00.000Z").as_deref(), Some("October 6, 2026"));
/// assert_eq!(format_date("soon"), None);
/// ```
pub fn format_date(iso: &str) -> Option<String> {
    const DISPLAY: &str = "%B %-d, %Y";

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(iso) {
        return Some(timestamp.format(DISPLAY).to_string());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(timestamp.format(DISPLAY).to_string());
    }
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .ok()
        .map(|date| date.format(DISPLAY).to_string())
}
