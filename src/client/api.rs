//! Transport seam for the posts backend.

use async_trait::async_trait;
use brezza_api_types::{Post, PostDraft, PostPatch};

use super::error::ApiError;

/// Abstract HTTP transport for a conventional posts REST API.
///
/// The shipped implementation is [`crate::infra::HttpPostsApi`]; tests
/// substitute in-process fakes. Implementations return server order as-is;
/// the cache layer owns presentation order.
#[async_trait]
pub trait PostsApi: Send + Sync {
    /// `GET /posts`: the full collection, any order.
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError>;

    /// `GET /posts/{id}`: a single post.
    async fn get_post(&self, id: i64) -> Result<Post, ApiError>;

    /// `POST /posts`: create from draft fields; the server assigns the id.
    async fn create_post(&self, draft: &PostDraft) -> Result<Post, ApiError>;

    /// `PATCH /posts/{id}`: partial update, changed fields only.
    async fn update_post(&self, id: i64, patch: &PostPatch) -> Result<Post, ApiError>;

    /// `DELETE /posts/{id}`: no content on success.
    async fn delete_post(&self, id: i64) -> Result<(), ApiError>;
}
