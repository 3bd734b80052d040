use thiserror::Error;

use crate::failure::FailureKind;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced while resolving an identifier to a molfile.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] BoxError),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("no substance named '{0}'")]
    NoMatch(String),

    #[error("search response is not a list of substances: {0}")]
    SearchBody(#[source] serde_json::Error),

    #[error("page has no JSON-LD block")]
    MissingJsonLd,

    #[error("JSON-LD block is not valid JSON: {0}")]
    JsonLd(#[source] serde_json::Error),

    #[error("page has no molfile representation")]
    NoMolfile,
}

impl ResolveError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::SearchBody(_) | Self::MissingJsonLd | Self::JsonLd(_) => FailureKind::Unparsable,
            Self::Pattern(_)
            | Self::Client(_)
            | Self::Transport { .. }
            | Self::Status { .. }
            | Self::NoMatch(_)
            | Self::NoMolfile => FailureKind::NotFound,
        }
    }
}
