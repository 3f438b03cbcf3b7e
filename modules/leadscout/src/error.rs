//! Error taxonomy for the dispatch layer.

use apify_client::ApifyError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LeadScoutError>;

#[derive(Debug, Error)]
pub enum LeadScoutError {
    /// Missing credential or nothing left to dispatch. Raised before any network call.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A target list or option failed its shape constraints.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The remote actor call itself failed. Never retried here.
    #[error("actor {actor_id} invocation failed: {source}")]
    Invocation {
        actor_id: String,
        #[source]
        source: ApifyError,
    },
}

impl LeadScoutError {
    pub fn invocation(actor_id: &str, source: ApifyError) -> Self {
        LeadScoutError::Invocation {
            actor_id: actor_id.to_string(),
            source,
        }
    }
}
