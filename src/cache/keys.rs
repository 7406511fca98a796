//! Cache key definitions.
//!
//! `QueryKey` identifies a cached query; `Tag` labels what a snapshot
//! depends on for invalidation purposes.

use std::fmt;

/// Identifies a cached query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The full post collection, newest first.
    List,
    /// A single post by id.
    Post(i64),
}

/// Invalidation label attached to cached query results.
///
/// When a mutation completes it declares the tags it invalidates; every
/// snapshot whose tag set intersects that declaration must refetch. A query
/// never needs to know which mutation staled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Membership of the post collection changed.
    PostList,
    /// The post with this id changed.
    Post(i64),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::PostList => write!(f, "Posts:LIST"),
            Tag::Post(id) => write!(f, "Posts:{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_equality() {
        assert_eq!(Tag::Post(5), Tag::Post(5));
        assert_ne!(Tag::Post(5), Tag::Post(7));
        assert_ne!(Tag::Post(5), Tag::PostList);
    }

    #[test]
    fn query_key_equality() {
        assert_eq!(QueryKey::Post(1), QueryKey::Post(1));
        assert_ne!(QueryKey::Post(1), QueryKey::List);
    }

    #[test]
    fn tag_display_matches_wire_labels() {
        assert_eq!(Tag::PostList.to_string(), "Posts:LIST");
        assert_eq!(Tag::Post(42).to_string(), "Posts:42");
    }
}
