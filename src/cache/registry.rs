//! Bidirectional tag registry.
//!
//! Tracks which cached queries depend on which tags, so a mutation that
//! declares invalidated tags can find every snapshot that must go stale
//! without knowing anything about the queries themselves.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use super::keys::{QueryKey, Tag};
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::registry";

/// Maps tags to dependent query keys and back.
///
/// Registration replaces a query's previous tag set, so a list refetch that
/// drops a deleted post also drops its stale `Posts:<id>` dependency.
pub struct TagRegistry {
    tag_to_keys: RwLock<HashMap<Tag, HashSet<QueryKey>>>,
    key_to_tags: RwLock<HashMap<QueryKey, HashSet<Tag>>>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self {
            tag_to_keys: RwLock::new(HashMap::new()),
            key_to_tags: RwLock::new(HashMap::new()),
        }
    }

    /// Register the tags a cached query depends on, replacing any previous
    /// registration for the same key.
    pub fn register(&self, key: QueryKey, tags: HashSet<Tag>) {
        let mut t2k = rw_write(&self.tag_to_keys, SOURCE, "register");
        let mut k2t = rw_write(&self.key_to_tags, SOURCE, "register");

        if let Some(previous) = k2t.remove(&key) {
            for tag in previous {
                if let Some(keys) = t2k.get_mut(&tag) {
                    keys.remove(&key);
                    if keys.is_empty() {
                        t2k.remove(&tag);
                    }
                }
            }
        }

        for tag in &tags {
            t2k.entry(*tag).or_default().insert(key);
        }
        k2t.insert(key, tags);
    }

    /// All query keys whose snapshots depend on the given tag.
    pub fn keys_for_tag(&self, tag: &Tag) -> HashSet<QueryKey> {
        rw_read(&self.tag_to_keys, SOURCE, "keys_for_tag")
            .get(tag)
            .cloned()
            .unwrap_or_default()
    }

    /// The tags a cached query depends on.
    pub fn tags_for_key(&self, key: &QueryKey) -> HashSet<Tag> {
        rw_read(&self.key_to_tags, SOURCE, "tags_for_key")
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    /// Drop a query and clean up its tag mappings. Called when a snapshot is
    /// evicted.
    pub fn unregister(&self, key: &QueryKey) {
        let mut t2k = rw_write(&self.tag_to_keys, SOURCE, "unregister");
        let mut k2t = rw_write(&self.key_to_tags, SOURCE, "unregister");

        if let Some(tags) = k2t.remove(key) {
            for tag in tags {
                if let Some(keys) = t2k.get_mut(&tag) {
                    keys.remove(key);
                    if keys.is_empty() {
                        t2k.remove(&tag);
                    }
                }
            }
        }
    }

    /// Clear all mappings.
    pub fn clear(&self) {
        rw_write(&self.tag_to_keys, SOURCE, "clear").clear();
        rw_write(&self.key_to_tags, SOURCE, "clear").clear();
    }

    /// Number of registered queries.
    pub fn key_count(&self) -> usize {
        rw_read(&self.key_to_tags, SOURCE, "key_count").len()
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        Self::new()
    }
}
