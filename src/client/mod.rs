//! Client layer: the transport seam and the mutation coordinator.

pub mod api;
pub mod error;
pub mod posts;

pub use api::PostsApi;
pub use error::ApiError;
pub use posts::PostsClient;
