use thiserror::Error;

#[derive(Error, Debug)]
pub enum HiveError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Worker error: {worker}: {message}")]
    Worker { worker: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No workers registered")]
    NoWorkers,

    #[error("Dispatch could not start: {0}")]
    DispatchInit(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl HiveError {
    pub fn worker(worker: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Worker {
            worker: worker.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HiveError>;
