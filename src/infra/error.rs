use thiserror::Error;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("invalid base url `{url}`: {source}")]
    BaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

impl InfraError {
    pub fn base_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::BaseUrl {
            url: url.into(),
            source,
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}
