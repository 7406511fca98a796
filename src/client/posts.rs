//! The posts client: cached reads and optimistic mutations.
//!
//! `PostsClient` is the single coordinator between readers, the snapshot
//! cache, and the HTTP transport. Reads are read-through: a missing snapshot
//! fetches, a stale snapshot refetches, a fresh one is served from memory.
//! Mutations follow the optimistic protocol:
//!
//! 1. apply the expected effect to the cached snapshots synchronously,
//!    keeping the inverse patch record;
//! 2. run the network step;
//! 3. on success, invalidate the declared tags (dependent snapshots go
//!    stale and refetch on next read);
//! 4. on failure, revert exactly the optimistic patch, then surface the
//!    error to the caller.
//!
//! The rollback always runs before the mutation future resolves, so callers
//! never observe a half-applied state from their own mutation.

use std::collections::HashSet;
use std::sync::Arc;

use brezza_api_types::{Post, PostDraft, PostPatch};
use metrics::counter;
use tracing::{debug, instrument, warn};

use crate::cache::{PatchRecord, QueryKey, QueryState, Snapshot, SnapshotStore, Tag, TagRegistry};
use crate::config::ClientConfig;
use crate::domain::posts::{provisional_post, validate_draft};

use super::api::PostsApi;
use super::error::ApiError;

const METRIC_CACHE_HIT: &str = "brezza_cache_hit_total";
const METRIC_CACHE_MISS: &str = "brezza_cache_miss_total";
const METRIC_CACHE_STALE: &str = "brezza_cache_stale_total";
const METRIC_ROLLBACK: &str = "brezza_mutation_rollback_total";

/// Entity cache and mutation coordinator for the posts collection.
///
/// Cheap to clone; clones share the same snapshots and registry. Construct
/// one per backend at application start and pass references down; there is
/// no hidden global.
#[derive(Clone)]
pub struct PostsClient {
    config: ClientConfig,
    api: Arc<dyn PostsApi>,
    store: Arc<SnapshotStore>,
    registry: Arc<TagRegistry>,
}

impl PostsClient {
    pub fn new(config: ClientConfig, api: Arc<dyn PostsApi>) -> Self {
        let store = Arc::new(SnapshotStore::new(&config));
        Self {
            config,
            api,
            store,
            registry: Arc::new(TagRegistry::new()),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Read the post collection, newest first.
    ///
    /// First call stores a `Loading` snapshot before fetching, so concurrent
    /// readers observe the loading state rather than a gap. A stale snapshot
    /// refetches before returning; a fresh one is served as-is. Cached errors
    /// count as fresh: the client never retries on its own.
    #[instrument(skip(self))]
    pub async fn posts(&self) -> QueryState<Vec<Post>> {
        match self.store.list() {
            Some(snapshot) if !snapshot.stale => {
                counter!(METRIC_CACHE_HIT, "query" => "list").increment(1);
                snapshot.state
            }
            Some(_) => {
                counter!(METRIC_CACHE_STALE, "query" => "list").increment(1);
                self.refresh_posts().await
            }
            None => {
                counter!(METRIC_CACHE_MISS, "query" => "list").increment(1);
                self.registry
                    .register(QueryKey::List, HashSet::from([Tag::PostList]));
                self.store.put_list(Snapshot::loading([Tag::PostList]));
                self.refresh_posts().await
            }
        }
    }

    /// Read a single post by id.
    #[instrument(skip(self))]
    pub async fn post(&self, id: i64) -> QueryState<Post> {
        match self.store.post(id) {
            Some(snapshot) if !snapshot.stale => {
                counter!(METRIC_CACHE_HIT, "query" => "post").increment(1);
                snapshot.state
            }
            Some(_) => {
                counter!(METRIC_CACHE_STALE, "query" => "post").increment(1);
                self.refresh_post(id).await
            }
            None => {
                counter!(METRIC_CACHE_MISS, "query" => "post").increment(1);
                self.registry
                    .register(QueryKey::Post(id), HashSet::from([Tag::Post(id)]));
                self.put_post_snapshot(id, Snapshot::loading([Tag::Post(id)]));
                self.refresh_post(id).await
            }
        }
    }

    /// Current list snapshot state without triggering a fetch.
    pub fn peek_posts(&self) -> Option<QueryState<Vec<Post>>> {
        self.store.list().map(|snapshot| snapshot.state)
    }

    /// Current single-post snapshot state without triggering a fetch.
    pub fn peek_post(&self, id: i64) -> Option<QueryState<Post>> {
        self.store.post(id).map(|snapshot| snapshot.state)
    }

    /// Fetch the list and replace the cached snapshot.
    ///
    /// The server's order is reversed before storing: the backend returns
    /// insertion order, the cache presents newest first. The stored snapshot
    /// is tagged with the list tag plus one tag per contained post.
    pub async fn refresh_posts(&self) -> QueryState<Vec<Post>> {
        match self.api.list_posts().await {
            Ok(mut posts) => {
                posts.reverse();
                let mut tags: HashSet<Tag> = posts.iter().map(|post| Tag::Post(post.id)).collect();
                tags.insert(Tag::PostList);
                debug!(count = posts.len(), "List snapshot refreshed");
                self.registry.register(QueryKey::List, tags.clone());
                self.store.put_list(Snapshot::success(posts.clone(), tags));
                QueryState::Success(posts)
            }
            Err(err) => {
                let tags = HashSet::from([Tag::PostList]);
                self.registry.register(QueryKey::List, tags.clone());
                self.store.put_list(Snapshot::error(err.clone(), tags));
                QueryState::Error(err)
            }
        }
    }

    /// Fetch one post and replace its cached snapshot.
    pub async fn refresh_post(&self, id: i64) -> QueryState<Post> {
        let tags = HashSet::from([Tag::Post(id)]);
        self.registry.register(QueryKey::Post(id), tags.clone());
        match self.api.get_post(id).await {
            Ok(post) => {
                self.put_post_snapshot(id, Snapshot::success(post.clone(), tags));
                QueryState::Success(post)
            }
            Err(err) => {
                self.put_post_snapshot(id, Snapshot::error(err.clone(), tags));
                QueryState::Error(err)
            }
        }
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a post.
    ///
    /// A provisional entry (client-generated id) is prepended to the cached
    /// list before the network step, so readers see it immediately. Success
    /// invalidates the list tag and, when enabled, spawns a background
    /// refetch that reconciles the provisional entry with the server's; a
    /// transient duplicate between confirm and refetch is resolved by the
    /// refetch replacing the whole list. Failure reverts the prepend.
    #[instrument(skip(self, draft), fields(user_id = draft.user_id))]
    pub async fn add_post(&self, draft: PostDraft) -> Result<Post, ApiError> {
        validate_draft(&draft)?;
        let record = self.store.prepend_to_list(provisional_post(&draft));
        match self.api.create_post(&draft).await {
            Ok(created) => {
                debug!(id = created.id, "Post created");
                self.invalidate(&[Tag::PostList]);
                self.spawn_list_reconcile();
                Ok(created)
            }
            Err(err) => {
                self.rollback("add", record);
                Err(err)
            }
        }
    }

    /// Partially update a post.
    ///
    /// The patch is merged into the cached single-post snapshot (if one
    /// exists) before the network step; failure restores the prior snapshot
    /// verbatim. Success invalidates the post's tag, staling every snapshot
    /// that contains it, including the list.
    #[instrument(skip(self, patch))]
    pub async fn update_post(&self, id: i64, patch: PostPatch) -> Result<Post, ApiError> {
        let record = self.store.merge_into_post(id, &patch);
        match self.api.update_post(id, &patch).await {
            Ok(updated) => {
                self.invalidate(&[Tag::Post(id)]);
                Ok(updated)
            }
            Err(err) => {
                self.rollback("update", record);
                Err(err)
            }
        }
    }

    /// Flip the liked flag on a post.
    ///
    /// The optimistic step targets the *list* snapshot, where the flag is
    /// rendered. A missing id there is a no-op; the network step still
    /// proceeds, since the server may know posts the cache does not.
    #[instrument(skip(self))]
    pub async fn toggle_like(&self, id: i64, liked: bool) -> Result<Post, ApiError> {
        let record = self.store.set_liked_in_list(id, liked);
        match self.api.update_post(id, &PostPatch::liked(liked)).await {
            Ok(updated) => {
                self.invalidate(&[Tag::Post(id)]);
                Ok(updated)
            }
            Err(err) => {
                self.rollback("toggle_like", record);
                Err(err)
            }
        }
    }

    /// Delete a post.
    ///
    /// The entry is removed from the cached list before the network step,
    /// preserving the order of the others. Failure reinserts it at its
    /// original index, not at the end.
    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        let record = self.store.remove_from_list(id);
        match self.api.delete_post(id).await {
            Ok(()) => {
                self.invalidate(&[Tag::Post(id)]);
                Ok(())
            }
            Err(err) => {
                self.rollback("delete", record);
                Err(err)
            }
        }
    }

    // ========================================================================
    // Invalidation
    // ========================================================================

    /// Mark every snapshot depending on one of `tags` stale.
    ///
    /// Stale snapshots keep serving their data until the next read, which
    /// refetches transparently.
    pub fn invalidate(&self, tags: &[Tag]) {
        for tag in tags {
            for key in self.registry.keys_for_tag(tag) {
                debug!(tag = %tag, key = ?key, "Snapshot invalidated");
                counter!(METRIC_CACHE_STALE, "query" => query_label(&key)).increment(1);
                self.store.mark_stale(&key);
            }
        }
    }

    fn rollback(&self, op: &'static str, record: PatchRecord) {
        counter!(METRIC_ROLLBACK, "op" => op).increment(1);
        warn!(op, "Mutation failed; reverting optimistic patch");
        self.store.revert(record);
    }

    /// Kick off the post-create list reconciliation in the background.
    ///
    /// Skipped when disabled by config or when nothing holds a list
    /// snapshot; the stale flag already forces a refetch on next read.
    fn spawn_list_reconcile(&self) {
        if !self.config.refetch_after_add || self.store.list().is_none() {
            return;
        }
        let client = self.clone();
        tokio::spawn(async move {
            if let QueryState::Error(err) = client.refresh_posts().await {
                warn!(error = %err, "Background list refetch failed");
            }
        });
    }

    fn put_post_snapshot(&self, id: i64, snapshot: Snapshot<Post>) {
        if let Some(evicted) = self.store.put_post(id, snapshot) {
            self.registry.unregister(&QueryKey::Post(evicted));
        }
    }
}

fn query_label(key: &QueryKey) -> &'static str {
    match key {
        QueryKey::List => "list",
        QueryKey::Post(_) => "post",
    }
}
