//! Post draft validation and provisional identity.
//!
//! A provisional post stands in for a server-created one between the
//! optimistic list patch and the confirming refetch. Its id is derived from
//! the current unix-epoch milliseconds, which keeps it far away from the
//! small sequential ids a conventional backend hands out.

use brezza_api_types::{Post, PostDraft};
use time::OffsetDateTime;

use super::error::DomainError;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum body length in characters.
pub const BODY_MAX_CHARS: usize = 1000;

/// Check a draft against the post invariants.
///
/// Title and body are required and length-bounded. The author id is not
/// checked here; the server owns user existence.
pub fn validate_draft(draft: &PostDraft) -> Result<(), DomainError> {
    if draft.title.trim().is_empty() {
        return Err(DomainError::validation("title is required"));
    }
    if draft.title.chars().count() > TITLE_MAX_CHARS {
        return Err(DomainError::validation(format!(
            "title exceeds {TITLE_MAX_CHARS} characters"
        )));
    }
    if draft.body.trim().is_empty() {
        return Err(DomainError::validation("body is required"));
    }
    if draft.body.chars().count() > BODY_MAX_CHARS {
        return Err(DomainError::validation(format!(
            "body exceeds {BODY_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

/// Client-generated id for a post that has not reached the server yet.
pub fn provisional_id() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}

/// Build the provisional post that is prepended to the cached list while the
/// create request is in flight.
pub fn provisional_post(draft: &PostDraft) -> Post {
    Post {
        id: provisional_id(),
        title: draft.title.clone(),
        body: draft.body.clone(),
        user_id: draft.user_id,
        liked: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str, body: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            body: body.to_string(),
            user_id: 1,
        }
    }

    #[test]
    fn accepts_a_plain_draft() {
        assert!(validate_draft(&draft("Title", "Body")).is_ok());
    }

    #[test]
    fn rejects_blank_title_and_body() {
        assert!(validate_draft(&draft("  ", "Body")).is_err());
        assert!(validate_draft(&draft("Title", "")).is_err());
    }

    #[test]
    fn enforces_length_limits_in_characters() {
        let long_title = "x".repeat(TITLE_MAX_CHARS + 1);
        assert!(validate_draft(&draft(&long_title, "Body")).is_err());

        let exact_title = "у".repeat(TITLE_MAX_CHARS); // multi-byte, still 100 chars
        assert!(validate_draft(&draft(&exact_title, "Body")).is_ok());

        let long_body = "x".repeat(BODY_MAX_CHARS + 1);
        assert!(validate_draft(&draft("Title", &long_body)).is_err());
    }

    #[test]
    fn provisional_post_copies_draft_fields() {
        let d = draft("Title", "Body");
        let post = provisional_post(&d);
        assert_eq!(post.title, "Title");
        assert_eq!(post.body, "Body");
        assert_eq!(post.user_id, 1);
        assert_eq!(post.liked, None);
        // Epoch-millisecond ids dwarf sequential server ids.
        assert!(post.id > 1_000_000_000_000);
    }
}
