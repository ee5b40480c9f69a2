//! The stage: a current actor plus the browser it drives

use std::sync::Arc;

use screenplay_browser::{BrowseTheWeb, Flushed, PlaywrightConfig};
use screenplay_core::{Abilities, Actor, Question, Task};
use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{E2eError, E2eResult};

/// Holds the actor that performs and asks, and the browser queue that
/// [`flush`](Stage::flush) drives.
///
/// A fresh stage's actor holds the stage's browser. Actors swapped in with
/// [`initiate_actor`](Stage::initiate_actor) should share
/// [`browser`](Stage::browser) if their questions are to be answered by a
/// flush.
pub struct Stage {
    actor: Actor,
    browser: Arc<BrowseTheWeb>,
}

impl Stage {
    pub fn new(browser: Arc<BrowseTheWeb>) -> Self {
        let actor = Actor::new(Abilities::new().with_shared(Arc::clone(&browser)));
        Self { actor, browser }
    }

    pub fn with_playwright(config: PlaywrightConfig) -> Self {
        Self::new(Arc::new(BrowseTheWeb::with_playwright(config)))
    }

    /// Replace the current actor.
    pub fn initiate_actor(&mut self, actor: Actor) -> &mut Self {
        debug!("Initiating actor {}", actor.name());
        self.actor = actor;
        self
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn browser(&self) -> &Arc<BrowseTheWeb> {
        &self.browser
    }

    pub fn perform<P>(&self, task: &Task<P>, param: P) -> E2eResult<&Self> {
        self.actor.perform(task, param)?;
        Ok(self)
    }

    /// Ask a question; the answer arrives once the browser is flushed.
    pub fn ask<P, R>(&self, question: &Question<P, R>, param: P) -> E2eResult<Answer<R>>
    where
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.actor.ask(question, param, move |answer: R| {
            let _ = tx.send(answer);
        })?;
        Ok(Answer {
            question: question.names().join(" | "),
            rx,
        })
    }

    pub async fn flush(&self) -> E2eResult<Flushed> {
        Ok(self.browser.flush().await?)
    }

    /// Ask, flush and wait for the answer.
    pub async fn answer<P, R>(&self, question: &Question<P, R>, param: P) -> E2eResult<R>
    where
        R: Send + 'static,
    {
        let answer = self.ask(question, param)?;
        self.flush().await?;
        answer.resolve().await
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::with_playwright(PlaywrightConfig::default())
    }
}

/// A pending answer to a question asked on a [`Stage`].
#[derive(Debug)]
pub struct Answer<R> {
    question: String,
    rx: oneshot::Receiver<R>,
}

impl<R> Answer<R> {
    /// Candidate names of the question this answers.
    pub fn question(&self) -> &str {
        &self.question
    }

    /// Wait for the answer.
    ///
    /// Only resolves once the browser has been flushed; fails with
    /// [`E2eError::Unanswered`] when the assertion was dropped unanswered.
    pub async fn resolve(self) -> E2eResult<R> {
        self.rx.await.map_err(|_| E2eError::Unanswered(self.question))
    }
}
