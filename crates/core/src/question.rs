//! Questions: interactions that produce an answer for an assertion

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::actor::Preparation;
use crate::error::Result;
use crate::interaction::{short_type_name, Candidate, Interaction};

/// Single-shot assertion callback receiving a question's answer.
///
/// It may run before `ask` returns or later, once a deferred collaborator
/// (such as a browser command queue) has produced the answer.
pub type Assertion<R> = Box<dyn FnOnce(R) + Send>;

/// Invocation half of a question interaction.
pub trait QuestionInteraction<P, R> {
    fn invoke(&self, param: P, assert: Assertion<R>) -> Result<()>;
}

/// A question: ordered interactions that accept a `P` and hand an `R` to
/// the assertion callback.
pub struct Question<P, R> {
    candidates: Vec<Candidate<dyn QuestionInteraction<P, R>>>,
}

impl<P, R> Question<P, R> {
    pub fn names(&self) -> Vec<&str> {
        self.candidates.iter().map(Candidate::name).collect()
    }

    pub(crate) fn candidates(&self) -> &[Candidate<dyn QuestionInteraction<P, R>>] {
        &self.candidates
    }
}

impl<P: 'static, R: 'static> Question<P, R> {
    pub fn of<I>() -> Self
    where
        I: Interaction + QuestionInteraction<P, R> + 'static,
    {
        Self { candidates: Vec::new() }.or::<I>()
    }

    pub fn or<I>(mut self) -> Self
    where
        I: Interaction + QuestionInteraction<P, R> + 'static,
    {
        self.candidates.push(Candidate::new(
            short_type_name::<I>(),
            |cx: &Preparation| {
                Ok(Box::new(I::prepare(cx)?) as Box<dyn QuestionInteraction<P, R>>)
            },
        ));
        self
    }

    pub fn from_fn<F>(name: impl Into<Cow<'static, str>>, construct: F) -> Self
    where
        F: Fn(&Preparation) -> Result<Box<dyn QuestionInteraction<P, R>>> + Send + Sync + 'static,
    {
        Self { candidates: Vec::new() }.or_fn(name, construct)
    }

    pub fn or_fn<F>(mut self, name: impl Into<Cow<'static, str>>, construct: F) -> Self
    where
        F: Fn(&Preparation) -> Result<Box<dyn QuestionInteraction<P, R>>> + Send + Sync + 'static,
    {
        self.candidates.push(Candidate::new(name, construct));
        self
    }

    pub fn or_question(mut self, other: Question<P, R>) -> Self {
        self.candidates.extend(other.candidates);
        self
    }

    /// Adapt parameter and answer types. `param` runs before invocation;
    /// `answer` runs inside the assertion, just before the caller's callback.
    pub fn map<Q, S, F, G>(&self, param: F, answer: G) -> Question<Q, S>
    where
        Q: 'static,
        S: 'static,
        F: Fn(Q) -> Result<P> + Send + Sync + 'static,
        G: Fn(R) -> S + Send + Sync + 'static,
    {
        let param: Arc<dyn Fn(Q) -> Result<P> + Send + Sync> = Arc::new(param);
        let answer: Arc<dyn Fn(R) -> S + Send + Sync> = Arc::new(answer);
        let candidates = self
            .candidates
            .iter()
            .map(|candidate| {
                let inner = candidate.clone();
                let param = Arc::clone(&param);
                let answer = Arc::clone(&answer);
                Candidate::new(candidate.name().to_owned(), move |cx: &Preparation| {
                    let interaction = inner.construct(cx)?;
                    Ok(Box::new(MappedQuestion {
                        interaction,
                        param: Arc::clone(&param),
                        answer: Arc::clone(&answer),
                    }) as Box<dyn QuestionInteraction<Q, S>>)
                })
            })
            .collect();
        Question { candidates }
    }
}

impl<P, R> Clone for Question<P, R> {
    fn clone(&self) -> Self {
        Self {
            candidates: self.candidates.clone(),
        }
    }
}

impl<P, R> fmt::Debug for Question<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Question").field(&self.names()).finish()
    }
}

struct MappedQuestion<P, R, Q, S> {
    interaction: Box<dyn QuestionInteraction<P, R>>,
    param: Arc<dyn Fn(Q) -> Result<P> + Send + Sync>,
    answer: Arc<dyn Fn(R) -> S + Send + Sync>,
}

impl<P, R, Q, S> QuestionInteraction<Q, S> for MappedQuestion<P, R, Q, S>
where
    P: 'static,
    R: 'static,
    Q: 'static,
    S: 'static,
{
    fn invoke(&self, param: Q, assert: Assertion<S>) -> Result<()> {
        let answer = Arc::clone(&self.answer);
        self.interaction
            .invoke((self.param)(param)?, Box::new(move |r: R| assert(answer(r))))
    }
}
