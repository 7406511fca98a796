//! Query lifecycle states and cached snapshots.

use std::collections::HashSet;

use crate::client::error::ApiError;

use super::keys::Tag;

/// Per-query lifecycle exposed to readers.
///
/// Every query passes through `Loading` on its first fetch; later refetches
/// replace the snapshot wholesale without revisiting `Loading`, so readers
/// keep seeing the previous data while a stale snapshot refreshes.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    Loading,
    Success(T),
    Error(ApiError),
}

impl<T> QueryState<T> {
    /// The successful payload, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }

    /// The surfaced error, if any.
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            QueryState::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }
}

/// The cached value currently held for a query key, together with the tags
/// it depends on and whether a mutation has staled it since it was stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub state: QueryState<T>,
    pub tags: HashSet<Tag>,
    pub stale: bool,
}

impl<T> Snapshot<T> {
    pub fn loading(tags: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            state: QueryState::Loading,
            tags: tags.into_iter().collect(),
            stale: false,
        }
    }

    pub fn success(data: T, tags: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            state: QueryState::Success(data),
            tags: tags.into_iter().collect(),
            stale: false,
        }
    }

    pub fn error(err: ApiError, tags: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            state: QueryState::Error(err),
            tags: tags.into_iter().collect(),
            stale: false,
        }
    }
}
