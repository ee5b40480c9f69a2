//! Browser-backed interactions and the `task` / `question` shorthands

use std::borrow::Cow;
use std::sync::Arc;

use screenplay_core::{
    Actor, Assertion, Interaction, Preparation, Question, QuestionInteraction, Result, Task,
    TaskInteraction,
};

use crate::ability::BrowseTheWeb;

/// Common construction for interactions that drive the browser.
///
/// Fetches [`BrowseTheWeb`] from the actor, so any interaction built on it is
/// skipped for actors without a browser.
#[derive(Debug, Clone)]
pub struct BrowserInteraction {
    browser: Arc<BrowseTheWeb>,
    actor: Actor,
}

impl BrowserInteraction {
    pub fn browser(&self) -> &BrowseTheWeb {
        &self.browser
    }

    /// The actor this interaction was prepared for, for sub-tasks.
    pub fn actor(&self) -> &Actor {
        &self.actor
    }
}

impl Interaction for BrowserInteraction {
    fn prepare(cx: &Preparation) -> Result<Self> {
        Ok(Self {
            browser: cx.ability::<BrowseTheWeb>()?,
            actor: cx.actor(),
        })
    }
}

/// A single-interaction task from a closure over the browser.
///
/// ```
/// use screenplay_browser::{task, BrowserCommand};
///
/// let open_settings = task("OpenSettings", |browser, tab: String| {
///     browser.run(BrowserCommand::Navigate {
///         url: format!("/settings#{tab}"),
///         wait_for_selector: None,
///     });
///     Ok(())
/// });
/// assert_eq!(open_settings.names(), vec!["OpenSettings"]);
/// ```
pub fn task<P, F>(name: impl Into<Cow<'static, str>>, procedure: F) -> Task<P>
where
    P: 'static,
    F: Fn(&BrowseTheWeb, P) -> Result<()> + Send + Sync + 'static,
{
    let procedure = Arc::new(procedure);
    Task::from_fn(name, move |cx: &Preparation| {
        Ok(Box::new(Procedure {
            base: BrowserInteraction::prepare(cx)?,
            procedure: Arc::clone(&procedure),
        }) as Box<dyn TaskInteraction<P>>)
    })
}

/// A single-interaction question from a closure over the browser.
///
/// The closure usually queues a query and hands `assert` to its answer
/// callback, so the assertion runs when the browser is flushed.
pub fn question<P, R, F>(name: impl Into<Cow<'static, str>>, procedure: F) -> Question<P, R>
where
    P: 'static,
    R: 'static,
    F: Fn(&BrowseTheWeb, P, Assertion<R>) -> Result<()> + Send + Sync + 'static,
{
    let procedure = Arc::new(procedure);
    Question::from_fn(name, move |cx: &Preparation| {
        Ok(Box::new(Procedure {
            base: BrowserInteraction::prepare(cx)?,
            procedure: Arc::clone(&procedure),
        }) as Box<dyn QuestionInteraction<P, R>>)
    })
}

struct Procedure<F> {
    base: BrowserInteraction,
    procedure: Arc<F>,
}

impl<P, F> TaskInteraction<P> for Procedure<F>
where
    F: Fn(&BrowseTheWeb, P) -> Result<()>,
{
    fn invoke(&self, param: P) -> Result<()> {
        (self.procedure)(self.base.browser(), param)
    }
}

impl<P, R, F> QuestionInteraction<P, R> for Procedure<F>
where
    F: Fn(&BrowseTheWeb, P, Assertion<R>) -> Result<()>,
{
    fn invoke(&self, param: P, assert: Assertion<R>) -> Result<()> {
        (self.procedure)(self.base.browser(), param, assert)
    }
}
