//! Post operations for the data API.

use inkpost_store::{
    NewPost, Post, PostPatch, PostStore, StoreError, StoreErrorKind, now_iso8601,
};
use serde::Serialize;
use tracing::info;

use crate::client::{BACKEND, RestStore, parse_rows, read_success, transport_error};

/// Ask the API to echo written rows back.
const RETURN_REPRESENTATION: &str = "return=representation";

/// Row body for inserts. The server assigns `id`.
#[derive(Serialize)]
struct NewRow<'a> {
    title: &'a str,
    body: &'a str,
    date: &'a str,
    published: bool,
}

fn id_filter(id: &str) -> String {
    format!("eq.{id}")
}

impl PostStore for RestStore {
    fn list(&self, include_drafts: bool) -> Result<Vec<Post>, StoreError> {
        let mut query = vec![("order", "date.desc")];
        if !include_drafts {
            query.push(("published", "eq.true"));
        }
        let url = self.url(&query);

        info!(include_drafts, "Listing posts");

        let response = self
            .authorized(self.agent.get(&url))
            .call()
            .map_err(transport_error)?;
        let posts = parse_rows(&read_success(response)?)?;

        info!("Found {} posts", posts.len());
        Ok(posts)
    }

    fn get(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let filter = id_filter(id);
        let url = self.url(&[("id", &filter)]);

        let response = self
            .authorized(self.agent.get(&url))
            .call()
            .map_err(transport_error)?;
        Ok(parse_rows(&read_success(response)?)?.into_iter().next())
    }

    fn create(&self, post: NewPost) -> Result<Post, StoreError> {
        let date = now_iso8601();
        let row = NewRow {
            title: &post.title,
            body: &post.body,
            date: &date,
            published: post.published,
        };

        info!("Creating post '{}'", post.title);

        let response = self
            .authorized(self.agent.post(self.endpoint()))
            .header("Prefer", RETURN_REPRESENTATION)
            .send_json(&row)
            .map_err(transport_error)?;

        let created = parse_rows(&read_success(response)?)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                StoreError::new(StoreErrorKind::InvalidData)
                    .with_backend(BACKEND)
                    .with_detail("insert returned no rows")
            })?;

        info!(id = %created.id, "Created post");
        Ok(created)
    }

    fn update(&self, id: &str, patch: PostPatch) -> Result<Option<Post>, StoreError> {
        if patch.is_empty() {
            return self.get(id);
        }

        let filter = id_filter(id);
        let url = self.url(&[("id", &filter)]);

        info!(id, "Updating post");

        let response = self
            .authorized(self.agent.patch(&url))
            .header("Prefer", RETURN_REPRESENTATION)
            .send_json(&patch)
            .map_err(transport_error)?;

        Ok(parse_rows(&read_success(response)?)?.into_iter().next())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let filter = id_filter(id);
        let url = self.url(&[("id", &filter)]);

        info!(id, "Deleting post");

        let response = self
            .authorized(self.agent.delete(&url))
            .call()
            .map_err(transport_error)?;
        read_success(response)?;
        Ok(())
    }
}
