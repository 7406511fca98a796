//! Snapshot storage.
//!
//! One slot for the list query and an LRU-bounded map for single-post
//! queries. Values are owned copies; readers always get a clone and never
//! observe a half-applied write.

use std::sync::RwLock;

use brezza_api_types::Post;
use lru::LruCache;

use crate::config::ClientConfig;

use super::keys::QueryKey;
use super::lock::{rw_read, rw_write};
use super::query::Snapshot;

const SOURCE: &str = "cache::store";

/// In-memory snapshot store for the posts collection and single posts.
pub struct SnapshotStore {
    list: RwLock<Option<Snapshot<Vec<Post>>>>,
    posts: RwLock<LruCache<i64, Snapshot<Post>>>,
}

impl SnapshotStore {
    /// Create a store sized from the client configuration.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            list: RwLock::new(None),
            posts: RwLock::new(LruCache::new(config.post_snapshot_limit_non_zero())),
        }
    }

    // ========================================================================
    // List snapshot
    // ========================================================================

    pub fn list(&self) -> Option<Snapshot<Vec<Post>>> {
        rw_read(&self.list, SOURCE, "list").clone()
    }

    pub fn put_list(&self, snapshot: Snapshot<Vec<Post>>) {
        *rw_write(&self.list, SOURCE, "put_list") = Some(snapshot);
    }

    pub fn mark_list_stale(&self) {
        if let Some(snapshot) = rw_write(&self.list, SOURCE, "mark_list_stale").as_mut() {
            snapshot.stale = true;
        }
    }

    // ========================================================================
    // Single-post snapshots
    // ========================================================================

    pub fn post(&self, id: i64) -> Option<Snapshot<Post>> {
        rw_write(&self.posts, SOURCE, "post").get(&id).cloned()
    }

    /// Store a single-post snapshot. Returns the id evicted by the LRU cap,
    /// if any, so the caller can unregister its tags.
    pub fn put_post(&self, id: i64, snapshot: Snapshot<Post>) -> Option<i64> {
        rw_write(&self.posts, SOURCE, "put_post")
            .push(id, snapshot)
            .and_then(|(evicted, _)| (evicted != id).then_some(evicted))
    }

    pub fn mark_post_stale(&self, id: i64) {
        if let Some(snapshot) = rw_write(&self.posts, SOURCE, "mark_post_stale").peek_mut(&id) {
            snapshot.stale = true;
        }
    }

    // ========================================================================
    // Dispatch and bulk operations
    // ========================================================================

    /// Mark the snapshot behind a query key stale. Missing snapshots are a
    /// silent no-op.
    pub fn mark_stale(&self, key: &QueryKey) {
        match key {
            QueryKey::List => self.mark_list_stale(),
            QueryKey::Post(id) => self.mark_post_stale(*id),
        }
    }

    /// Drop all cached snapshots.
    pub fn clear(&self) {
        *rw_write(&self.list, SOURCE, "clear.list") = None;
        rw_write(&self.posts, SOURCE, "clear.posts").clear();
    }

    // Lock access for the optimistic patch ops in `patch.rs`.

    pub(crate) fn list_lock(&self) -> &RwLock<Option<Snapshot<Vec<Post>>>> {
        &self.list
    }

    pub(crate) fn posts_lock(&self) -> &RwLock<LruCache<i64, Snapshot<Post>>> {
        &self.posts
    }
}
