//! Error types for the stage and scenario runner

use screenplay_browser::BrowserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Screenplay error: {0}")]
    Screenplay(#[from] screenplay_core::Error),

    #[error("Browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("Scenario parse error: {0}")]
    SpecParse(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Unknown question: {0}")]
    UnknownQuestion(String),

    /// The chosen interaction finished without calling its assertion.
    #[error("Question was never answered: {0}")]
    Unanswered(String),

    #[error("Expectation failed for {question}: {reason}")]
    ExpectationFailed { question: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
