use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to save {what}: {source}")]
    Persist {
        what: &'static str,
        #[source]
        source: Box<Error>,
    },

    #[error("completion API errored: {0}")]
    Api(String),

    #[error("completion API returned no choices")]
    NoChoices,

    #[error("Missing API key. Set OPENAI_KEY or OPENAI_API_KEY, or pass --api-key")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read input: {0}")]
    Input(std::io::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("aborted: empty question")]
    EmptyQuestion,

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("session already exists: {0}")]
    SessionExists(String),

    #[error("the default session cannot be deleted")]
    DefaultSession,

    #[error("invalid message role: {0}")]
    InvalidRole(String),
}

impl Error {
    pub(crate) fn persist(what: &'static str, source: Error) -> Self {
        Error::Persist {
            what,
            source: Box::new(source),
        }
    }
}
