//! Optimistic patches and their inverse records.
//!
//! Every mutation applies its expected effect to the cached snapshots before
//! the network round-trip and receives a [`PatchRecord`] describing exactly
//! what changed. On failure the record is handed to [`SnapshotStore::revert`],
//! which undoes that change and nothing else, so a rollback never clobbers
//! entries touched by other in-flight mutations.

use std::sync::RwLockWriteGuard;

use brezza_api_types::{Post, PostPatch};
use lru::LruCache;
use tracing::debug;

use super::lock::rw_write;
use super::query::{QueryState, Snapshot};
use super::store::SnapshotStore;

const SOURCE: &str = "cache::patch";

/// Inverse record of one applied optimistic patch.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchRecord {
    /// Nothing was patched (no snapshot to patch, or the entry was absent).
    Noop,
    /// A provisional post was prepended to the list snapshot.
    ListPrepended { id: i64 },
    /// `liked` was assigned on one list entry; `prior` is the old value.
    ListLikedSet { id: i64, prior: Option<bool> },
    /// One entry was removed from the list snapshot at `index`.
    ListRemoved { index: usize, post: Post },
    /// Patch fields were merged into a single-post snapshot; `prior` is the
    /// pre-merge post.
    PostMerged { id: i64, prior: Post },
}

impl SnapshotStore {
    /// Prepend a provisional post to the list snapshot.
    pub fn prepend_to_list(&self, post: Post) -> PatchRecord {
        let id = post.id;
        match self.list_data_mut("prepend_to_list", |posts| posts.insert(0, post)) {
            Some(()) => PatchRecord::ListPrepended { id },
            None => PatchRecord::Noop,
        }
    }

    /// Set `liked` on the matching list entry. No-op when the id is absent
    /// from the cached list; the caller's network step still proceeds.
    pub fn set_liked_in_list(&self, id: i64, liked: bool) -> PatchRecord {
        let mut record = PatchRecord::Noop;
        self.list_data_mut("set_liked_in_list", |posts| {
            if let Some(post) = posts.iter_mut().find(|post| post.id == id) {
                record = PatchRecord::ListLikedSet {
                    id,
                    prior: post.liked,
                };
                post.liked = Some(liked);
            }
        });
        record
    }

    /// Remove the matching entry from the list snapshot, remembering its
    /// position for an exact rollback.
    pub fn remove_from_list(&self, id: i64) -> PatchRecord {
        let mut record = PatchRecord::Noop;
        self.list_data_mut("remove_from_list", |posts| {
            if let Some(index) = posts.iter().position(|post| post.id == id) {
                let post = posts.remove(index);
                record = PatchRecord::ListRemoved { index, post };
            }
        });
        record
    }

    /// Merge patch fields into the single-post snapshot for `id`, if one
    /// exists with successful data.
    pub fn merge_into_post(&self, id: i64, patch: &PostPatch) -> PatchRecord {
        let mut posts = self.posts_guard("merge_into_post");
        let Some(snapshot) = posts.peek_mut(&id) else {
            return PatchRecord::Noop;
        };
        let QueryState::Success(post) = &mut snapshot.state else {
            return PatchRecord::Noop;
        };

        let prior = post.clone();
        if let Some(title) = &patch.title {
            post.title = title.clone();
        }
        if let Some(body) = &patch.body {
            post.body = body.clone();
        }
        if let Some(user_id) = patch.user_id {
            post.user_id = user_id;
        }
        if let Some(liked) = patch.liked {
            post.liked = Some(liked);
        }
        PatchRecord::PostMerged { id, prior }
    }

    /// Undo exactly the change described by `record`.
    pub fn revert(&self, record: PatchRecord) {
        debug!(record = ?record, "Reverting optimistic patch");
        match record {
            PatchRecord::Noop => {}
            PatchRecord::ListPrepended { id } => {
                self.list_data_mut("revert.prepended", |posts| {
                    posts.retain(|post| post.id != id);
                });
            }
            PatchRecord::ListLikedSet { id, prior } => {
                self.list_data_mut("revert.liked", |posts| {
                    if let Some(post) = posts.iter_mut().find(|post| post.id == id) {
                        post.liked = prior;
                    }
                });
            }
            PatchRecord::ListRemoved { index, post } => {
                self.list_data_mut("revert.removed", |posts| {
                    let index = index.min(posts.len());
                    posts.insert(index, post);
                });
            }
            PatchRecord::PostMerged { id, prior } => {
                let mut posts = self.posts_guard("revert.merged");
                if let Some(snapshot) = posts.peek_mut(&id)
                    && let QueryState::Success(post) = &mut snapshot.state
                {
                    *post = prior;
                }
            }
        }
    }

    /// Run `f` over the list snapshot's successful data, if present.
    /// Returns `Some(())` when the data was reachable.
    fn list_data_mut(&self, op: &'static str, f: impl FnOnce(&mut Vec<Post>)) -> Option<()> {
        let mut guard = rw_write(self.list_lock(), SOURCE, op);
        let snapshot = guard.as_mut()?;
        let QueryState::Success(posts) = &mut snapshot.state else {
            return None;
        };
        f(posts);
        Some(())
    }

    fn posts_guard(&self, op: &'static str) -> RwLockWriteGuard<'_, LruCache<i64, Snapshot<Post>>> {
        rw_write(self.posts_lock(), SOURCE, op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::keys::Tag;
    use crate::cache::query::Snapshot;
    use crate::config::ClientConfig;

    fn sample_post(id: i64) -> Post {
        Post {
            id,
            title: format!("post {id}"),
            body: "body".to_string(),
            user_id: 1,
            liked: None,
        }
    }

    fn store_with_list(ids: &[i64]) -> SnapshotStore {
        let store = SnapshotStore::new(&ClientConfig::default());
        let posts: Vec<Post> = ids.iter().copied().map(sample_post).collect();
        let mut tags: Vec<Tag> = ids.iter().copied().map(Tag::Post).collect();
        tags.push(Tag::PostList);
        store.put_list(Snapshot::success(posts, tags));
        store
    }

    fn list_ids(store: &SnapshotStore) -> Vec<i64> {
        store
            .list()
            .and_then(|snap| snap.state.data().cloned())
            .map(|posts| posts.iter().map(|p| p.id).collect())
            .unwrap_or_default()
    }

    #[test]
    fn prepend_and_revert() {
        let store = store_with_list(&[3, 2, 1]);

        let record = store.prepend_to_list(sample_post(99));
        assert_eq!(record, PatchRecord::ListPrepended { id: 99 });
        assert_eq!(list_ids(&store), vec![99, 3, 2, 1]);

        store.revert(record);
        assert_eq!(list_ids(&store), vec![3, 2, 1]);
    }

    #[test]
    fn prepend_without_list_snapshot_is_noop() {
        let store = SnapshotStore::new(&ClientConfig::default());
        assert_eq!(store.prepend_to_list(sample_post(99)), PatchRecord::Noop);
        assert!(store.list().is_none());
    }

    #[test]
    fn liked_set_and_revert_restores_prior_value() {
        let store = store_with_list(&[3, 2, 1]);

        let record = store.set_liked_in_list(2, true);
        assert_eq!(
            record,
            PatchRecord::ListLikedSet {
                id: 2,
                prior: None
            }
        );
        let posts = store.list().unwrap().state.data().cloned().unwrap();
        assert_eq!(posts[1].liked, Some(true));

        store.revert(record);
        let posts = store.list().unwrap().state.data().cloned().unwrap();
        assert_eq!(posts[1].liked, None);
    }

    #[test]
    fn liked_set_on_missing_id_is_noop() {
        let store = store_with_list(&[3, 2, 1]);
        assert_eq!(store.set_liked_in_list(999, true), PatchRecord::Noop);
        assert_eq!(list_ids(&store), vec![3, 2, 1]);
    }

    #[test]
    fn remove_and_revert_reinserts_at_original_index() {
        let store = store_with_list(&[10, 20, 30]);

        let record = store.remove_from_list(20);
        assert_eq!(list_ids(&store), vec![10, 30]);

        store.revert(record);
        assert_eq!(list_ids(&store), vec![10, 20, 30]);
    }

    #[test]
    fn remove_revert_clamps_index_to_shrunk_list() {
        let store = store_with_list(&[10, 20, 30]);

        let record = store.remove_from_list(30);
        // The list shrank underneath the pending rollback.
        store.put_list(Snapshot::success(vec![sample_post(10)], [Tag::PostList]));

        store.revert(record);
        assert_eq!(list_ids(&store), vec![10, 30]);
    }

    #[test]
    fn merge_and_revert_restores_snapshot_verbatim() {
        let store = SnapshotStore::new(&ClientConfig::default());
        let _ = store.put_post(5, Snapshot::success(sample_post(5), [Tag::Post(5)]));

        let patch = PostPatch {
            title: Some("edited".to_string()),
            liked: Some(true),
            ..Default::default()
        };
        let record = store.merge_into_post(5, &patch);

        let merged = store.post(5).unwrap().state.data().cloned().unwrap();
        assert_eq!(merged.title, "edited");
        assert_eq!(merged.liked, Some(true));
        assert_eq!(merged.body, "body"); // untouched field survives the merge

        store.revert(record);
        let restored = store.post(5).unwrap().state.data().cloned().unwrap();
        assert_eq!(restored, sample_post(5));
    }

    #[test]
    fn merge_into_missing_snapshot_is_noop() {
        let store = SnapshotStore::new(&ClientConfig::default());
        let record = store.merge_into_post(5, &PostPatch::liked(true));
        assert_eq!(record, PatchRecord::Noop);
    }

    #[test]
    fn revert_noop_changes_nothing() {
        let store = store_with_list(&[1]);
        store.revert(PatchRecord::Noop);
        assert_eq!(list_ids(&store), vec![1]);
    }
}
