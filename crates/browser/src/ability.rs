//! The browser ability: a deferred command queue in front of a driver

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::command::{BrowserCommand, Instruction, Query};
use crate::driver::Driver;
use crate::error::{BrowserError, BrowserResult};
use crate::playwright::{PlaywrightConfig, PlaywrightDriver};

type OnAnswer = Box<dyn FnOnce(Value) -> BrowserResult<()> + Send>;

struct Pending {
    instruction: Instruction,
    on_answer: Option<OnAnswer>,
}

/// Lets an actor drive a browser.
///
/// Interactions only queue work here; nothing touches the browser until
/// [`flush`](BrowseTheWeb::flush) hands the queue to the driver. Answers to
/// queries are delivered to their callbacks during the flush, in queue
/// order.
pub struct BrowseTheWeb {
    driver: Arc<dyn Driver>,
    queue: Mutex<Vec<Pending>>,
}

/// Summary of one flush
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Flushed {
    pub instructions: Vec<String>,
    pub answers: usize,
    pub duration_ms: u64,
}

impl BrowseTheWeb {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver,
            queue: Mutex::new(Vec::new()),
        }
    }

    pub fn with_playwright(config: PlaywrightConfig) -> Self {
        Self::new(Arc::new(PlaywrightDriver::new(config)))
    }

    /// Queue a command.
    pub fn run(&self, command: BrowserCommand) -> &Self {
        self.queue.lock().push(Pending {
            instruction: Instruction::Command(command),
            on_answer: None,
        });
        self
    }

    /// Queue a query; `on_answer` receives the raw JSON answer during flush.
    pub fn query<F>(&self, query: Query, on_answer: F) -> &Self
    where
        F: FnOnce(Value) -> BrowserResult<()> + Send + 'static,
    {
        self.queue.lock().push(Pending {
            instruction: Instruction::Query(query),
            on_answer: Some(Box::new(on_answer)),
        });
        self
    }

    /// Queue a query whose answer is decoded into `T` first.
    pub fn query_as<T, F>(&self, query: Query, on_answer: F) -> &Self
    where
        T: DeserializeOwned,
        F: FnOnce(T) + Send + 'static,
    {
        self.query(query, move |value| {
            on_answer(serde_json::from_value(value)?);
            Ok(())
        })
    }

    /// Number of queued instructions.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Run everything queued so far through the driver.
    ///
    /// The queue is taken before the driver runs, so callbacks may queue
    /// follow-up work for the next flush. When the driver fails, pending
    /// callbacks are dropped without being called. A callback that fails
    /// does not stop later ones; the first such error is returned.
    pub async fn flush(&self) -> BrowserResult<Flushed> {
        let pending = std::mem::take(&mut *self.queue.lock());
        if pending.is_empty() {
            return Ok(Flushed::default());
        }

        let start = Instant::now();
        let (instructions, callbacks): (Vec<Instruction>, Vec<Option<OnAnswer>>) = pending
            .into_iter()
            .map(|p| (p.instruction, p.on_answer))
            .unzip();
        let names: Vec<String> = instructions.iter().map(Instruction::name).collect();

        debug!("Flushing {} browser instruction(s)", instructions.len());

        let answers = self.driver.run(&instructions).await?;
        let callbacks: Vec<OnAnswer> = callbacks.into_iter().flatten().collect();
        if answers.len() != callbacks.len() {
            return Err(BrowserError::AnswerCount {
                expected: callbacks.len(),
                actual: answers.len(),
            });
        }

        let answered = answers.len();
        let mut first_error = None;
        for (callback, answer) in callbacks.into_iter().zip(answers) {
            if let Err(e) = callback(answer) {
                first_error.get_or_insert(e);
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        Ok(Flushed {
            instructions: names,
            answers: answered,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl Default for BrowseTheWeb {
    fn default() -> Self {
        Self::with_playwright(PlaywrightConfig::default())
    }
}

impl fmt::Debug for BrowseTheWeb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrowseTheWeb")
            .field("pending", &self.pending())
            .finish()
    }
}
