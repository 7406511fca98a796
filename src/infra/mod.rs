//! Infrastructure: concrete HTTP transport and telemetry wiring.

pub mod error;
pub mod http;
pub mod telemetry;

pub use error::InfraError;
pub use http::HttpPostsApi;
