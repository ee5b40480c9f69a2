//! Error types for browser automation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Playwright not found. Install with: npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Expected {expected} answer(s) from the browser, got {actual}")]
    AnswerCount { expected: usize, actual: usize },

    #[error("Malformed answer: {0}")]
    MalformedAnswer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type BrowserResult<T> = Result<T, BrowserError>;

impl From<BrowserError> for screenplay_core::Error {
    fn from(e: BrowserError) -> Self {
        screenplay_core::Error::interaction(e)
    }
}
