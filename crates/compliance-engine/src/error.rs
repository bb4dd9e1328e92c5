use thiserror::Error;

/// One rule source failed for one query. Never fatal to an analysis.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("could not parse source response: {0}")]
    Parse(String),

    #[error("text generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("source timed out after {0}ms")]
    Timeout(u64),
}

/// Failure talking to a text-generation backend
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("response did not contain any generated text")]
    EmptyResponse,
}

/// Narrative report generation failed; the synthesizer falls back to a template
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("narrative backend failed: {0}")]
    Backend(#[from] LlmError),

    #[error("narrative generation timed out after {0}ms")]
    Timeout(u64),

    #[error("narrative backend returned no text")]
    Empty,
}

/// Persistence collaborator failure. Logged, never fatal to an analysis.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("stored rule could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Missing or malformed startup configuration. Fatal and never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to initialize client: {0}")]
    Client(String),
}

/// The only errors that abort an analysis request
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}
