//! Tasks: interactions that change state and yield nothing

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::actor::Preparation;
use crate::error::Result;
use crate::interaction::{short_type_name, Candidate, Interaction};

/// Invocation half of a task interaction.
pub trait TaskInteraction<P> {
    fn invoke(&self, param: P) -> Result<()>;
}

/// A task: ordered interactions that accept a `P` and act through side
/// effects.
///
/// Declaration order is priority. The actor runs the first candidate it can
/// construct.
pub struct Task<P> {
    candidates: Vec<Candidate<dyn TaskInteraction<P>>>,
}

impl<P> Task<P> {
    /// Candidate names in declared order.
    pub fn names(&self) -> Vec<&str> {
        self.candidates.iter().map(Candidate::name).collect()
    }

    pub(crate) fn candidates(&self) -> &[Candidate<dyn TaskInteraction<P>>] {
        &self.candidates
    }
}

impl<P: 'static> Task<P> {
    /// A task with a single interaction.
    pub fn of<I>() -> Self
    where
        I: Interaction + TaskInteraction<P> + 'static,
    {
        Self { candidates: Vec::new() }.or::<I>()
    }

    /// Append a fallback interaction.
    pub fn or<I>(mut self) -> Self
    where
        I: Interaction + TaskInteraction<P> + 'static,
    {
        self.candidates.push(Candidate::new(
            short_type_name::<I>(),
            |cx: &Preparation| Ok(Box::new(I::prepare(cx)?) as Box<dyn TaskInteraction<P>>),
        ));
        self
    }

    /// A task with a single closure-built interaction.
    pub fn from_fn<F>(name: impl Into<Cow<'static, str>>, construct: F) -> Self
    where
        F: Fn(&Preparation) -> Result<Box<dyn TaskInteraction<P>>> + Send + Sync + 'static,
    {
        Self { candidates: Vec::new() }.or_fn(name, construct)
    }

    pub fn or_fn<F>(mut self, name: impl Into<Cow<'static, str>>, construct: F) -> Self
    where
        F: Fn(&Preparation) -> Result<Box<dyn TaskInteraction<P>>> + Send + Sync + 'static,
    {
        self.candidates.push(Candidate::new(name, construct));
        self
    }

    /// Append every candidate of `other`, after the existing ones.
    pub fn or_task(mut self, other: Task<P>) -> Self {
        self.candidates.extend(other.candidates);
        self
    }

    /// Adapt the task to another parameter type. Candidate names and order
    /// are kept; `map` runs right before the chosen interaction is invoked.
    pub fn map_param<Q, F>(&self, map: F) -> Task<Q>
    where
        Q: 'static,
        F: Fn(Q) -> Result<P> + Send + Sync + 'static,
    {
        let map: Arc<dyn Fn(Q) -> Result<P> + Send + Sync> = Arc::new(map);
        let candidates = self
            .candidates
            .iter()
            .map(|candidate| {
                let inner = candidate.clone();
                let map = Arc::clone(&map);
                Candidate::new(candidate.name().to_owned(), move |cx: &Preparation| {
                    let interaction = inner.construct(cx)?;
                    Ok(Box::new(MappedTask {
                        interaction,
                        map: Arc::clone(&map),
                    }) as Box<dyn TaskInteraction<Q>>)
                })
            })
            .collect();
        Task { candidates }
    }
}

impl<P> Clone for Task<P> {
    fn clone(&self) -> Self {
        Self {
            candidates: self.candidates.clone(),
        }
    }
}

impl<P> fmt::Debug for Task<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Task").field(&self.names()).finish()
    }
}

struct MappedTask<P, Q> {
    interaction: Box<dyn TaskInteraction<P>>,
    map: Arc<dyn Fn(Q) -> Result<P> + Send + Sync>,
}

impl<P, Q> TaskInteraction<Q> for MappedTask<P, Q> {
    fn invoke(&self, param: Q) -> Result<()> {
        self.interaction.invoke((self.map)(param)?)
    }
}
