//! Shared request and response types for the posts API.
//!
//! Wire format is JSON with camelCase field names. Optional fields are
//! omitted from request bodies when unset, so a `PATCH` carries only the
//! fields that actually change.

use serde::{Deserialize, Serialize};

/// A persisted post as returned by the server.
///
/// `liked` is absent for posts that were never liked; the server treats
/// absent and `false` the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liked: Option<bool>,
}

/// Fields for creating a post. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub title: String,
    pub body: String,
    pub user_id: i64,
}

/// Partial update for an existing post.
///
/// Only set fields are serialized; the id travels in the URL, never in the
/// body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liked: Option<bool>,
}

impl PostPatch {
    /// A patch that only flips the liked flag.
    pub fn liked(liked: bool) -> Self {
        Self {
            liked: Some(liked),
            ..Self::default()
        }
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.body.is_none() && self.user_id.is_none() && self.liked.is_none()
    }
}
