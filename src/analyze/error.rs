// src/analyze/error.rs
use thiserror::Error;

/// Failures of one LLM submission.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI is disabled")]
    Disabled,
    #[error("missing API key for {0}")]
    MissingApiKey(&'static str),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("provider response had no text")]
    EmptyResponse,
}

/// Failures locating a structured block inside an LLM reply.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no {0} found in reply")]
    NotFound(&'static str),
    #[error("{0} starting at byte {1} is never closed")]
    Unterminated(&'static str, usize),
    #[error("mismatched '{found}' at byte {at}")]
    Mismatched { found: char, at: usize },
}

/// Why a facet fell back to its neutral value.
#[derive(Debug, Error)]
pub enum FacetError {
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("reply does not match the facet schema: {0}")]
    Shape(#[from] serde_json::Error),
    #[error("empty reply")]
    EmptyReply,
    #[error("facet timed out after {0:?}")]
    TimedOut(std::time::Duration),
    #[error("facet panicked")]
    Panicked,
}
