use pantry_core::{DomainError, SubmissionId};

/// Failure talking to the inventory API.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    /// Non-success status, with the server's `{ "error": ... }` message or a fallback.
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api(_, message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Failure of a multi-step submission (edit, expire, restock).
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// Rejected before anything was sent.
    #[error(transparent)]
    Invalid(#[from] DomainError),

    /// The metadata update failed; no transaction was sent.
    #[error("metadata update failed: {0}")]
    Metadata(#[source] ClientError),

    /// The expiration date update failed; no transaction was sent.
    #[error("expiration update failed: {0}")]
    Expiration(#[source] ClientError),

    /// A transaction was rejected after `acknowledged` earlier ones were accepted.
    /// Nothing is rolled back.
    #[error("submission {submission_id} stopped after {acknowledged} transaction(s): {source}")]
    Partial {
        submission_id: SubmissionId,
        acknowledged: usize,
        #[source]
        source: ClientError,
    },
}

impl SubmissionError {
    /// Text to show the user.
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Invalid(err) => err.user_message(),
            SubmissionError::Metadata(err)
            | SubmissionError::Expiration(err)
            | SubmissionError::Partial { source: err, .. } => err.user_message(),
        }
    }

    /// Submission to reuse when retrying, so already accepted transactions carry the
    /// same idempotency keys the second time.
    pub fn submission_id(&self) -> Option<SubmissionId> {
        match self {
            SubmissionError::Partial { submission_id, .. } => Some(*submission_id),
            _ => None,
        }
    }

    /// Transactions the API accepted before the failure.
    pub fn acknowledged(&self) -> usize {
        match self {
            SubmissionError::Partial { acknowledged, .. } => *acknowledged,
            _ => 0,
        }
    }
}
