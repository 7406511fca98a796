//! brezza: a client-side cached data layer for posts APIs.
//!
//! The crate keeps the last-known server state of a posts collection in an
//! in-memory snapshot store and mediates every write through an
//! optimistic-apply-then-confirm-or-rollback protocol:
//!
//! - reads go through [`client::PostsClient`] and expose a
//!   loading / success / error lifecycle per query;
//! - mutations patch the cached snapshots synchronously before the network
//!   round-trip, and revert exactly that patch if the round-trip fails;
//! - successful mutations declare invalidation tags; snapshots whose tags
//!   intersect the declared set go stale and are refetched on next read.
//!
//! The HTTP transport is a trait seam ([`client::PostsApi`]); the shipped
//! implementation is [`infra::HttpPostsApi`] on `reqwest`.
//!
//! ```no_run
//! use brezza::client::PostsClient;
//! use brezza::config::ClientConfig;
//! use brezza::infra::HttpPostsApi;
//! use brezza_api_types::PostDraft;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::default();
//! let api = HttpPostsApi::new(&config)?;
//! let client = PostsClient::new(config, std::sync::Arc::new(api));
//!
//! let posts = client.posts().await;
//! let created = client
//!     .add_post(PostDraft {
//!         title: "hello".into(),
//!         body: "first post".into(),
//!         user_id: 1,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod infra;

pub use brezza_api_types::{Post, PostDraft, PostPatch};
