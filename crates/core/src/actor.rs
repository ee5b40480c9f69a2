//! The actor and interaction resolution

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::ability::{Abilities, Ability};
use crate::error::{Error, Result};
use crate::interaction::{short_type_name, Candidate};
use crate::question::Question;
use crate::task::Task;

/// Holds abilities and uses them to perform tasks and answer questions.
///
/// Cloning an actor is cheap; clones share the same ability instances.
#[derive(Clone)]
pub struct Actor {
    inner: Arc<ActorInner>,
}

struct ActorInner {
    name: String,
    abilities: Abilities,
}

impl Actor {
    pub fn new(abilities: Abilities) -> Self {
        Self::named("actor", abilities)
    }

    pub fn named(name: impl Into<String>, abilities: Abilities) -> Self {
        Self {
            inner: Arc::new(ActorInner {
                name: name.into(),
                abilities,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Type names of the abilities this actor holds.
    pub fn ability_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inner.abilities.names()
    }

    /// Perform a task.
    pub fn perform<P>(&self, task: &Task<P>, param: P) -> Result<&Self> {
        self.prepare(task.candidates())?.invoke(param)?;
        Ok(self)
    }

    /// Ask a question. `assert` is forwarded to the chosen interaction
    /// untouched.
    pub fn ask<P, R, A>(&self, question: &Question<P, R>, param: P, assert: A) -> Result<&Self>
    where
        A: FnOnce(R) + Send + 'static,
    {
        self.prepare(question.candidates())?
            .invoke(param, Box::new(assert))?;
        Ok(self)
    }

    /// Construct the first candidate whose abilities are all available.
    ///
    /// Candidates reporting a missing ability are skipped; any other error
    /// aborts the scan. The lookup scope closes on every exit path.
    fn prepare<I: ?Sized>(&self, candidates: &[Candidate<I>]) -> Result<Box<I>> {
        let scope = Scope::open();
        let cx = Preparation {
            actor: self.clone(),
            open: scope.flag(),
        };

        for candidate in candidates {
            match candidate.construct(&cx) {
                Ok(interaction) => {
                    debug!("{} prepared {}", self.name(), candidate.name());
                    return Ok(interaction);
                }
                Err(Error::MissingAbility { ability }) => {
                    trace!(
                        "{} cannot use {}: missing {}",
                        self.name(),
                        candidate.name(),
                        ability
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::UnsupportedTask {
            interactions: candidates.iter().map(|c| c.name().to_string()).collect(),
        })
    }
}

impl fmt::Debug for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actor")
            .field("name", &self.inner.name)
            .field("abilities", &self.inner.abilities)
            .finish()
    }
}

/// Ability lookup handle passed to interaction constructors.
///
/// Each resolution gets its own handle, so nested resolutions on the same
/// actor never interfere. A clone kept past construction stops working once
/// its resolution is over.
#[derive(Clone)]
pub struct Preparation {
    actor: Actor,
    open: Arc<AtomicBool>,
}

impl Preparation {
    /// Fetch the actor's first ability of type `T`.
    pub fn ability<T: Ability>(&self) -> Result<Arc<T>> {
        if !self.open.load(Ordering::Acquire) {
            return Err(Error::AbilityRequest);
        }
        self.actor
            .inner
            .abilities
            .find::<T>()
            .ok_or(Error::MissingAbility {
                ability: short_type_name::<T>(),
            })
    }

    /// The actor being prepared for, for interactions that perform
    /// sub-tasks when invoked.
    pub fn actor(&self) -> Actor {
        self.actor.clone()
    }
}

impl fmt::Debug for Preparation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preparation")
            .field("actor", &self.actor.name())
            .field("open", &self.open.load(Ordering::Acquire))
            .finish()
    }
}

/// Lifetime of one resolution pass.
struct Scope {
    open: Arc<AtomicBool>,
}

impl Scope {
    fn open() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(true)),
        }
    }

    fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.open)
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.open.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::Interaction;
    use crate::task::TaskInteraction;
    use std::sync::atomic::AtomicUsize;

    #[derive(Clone, Default)]
    struct Counter(Arc<AtomicUsize>);

    impl Counter {
        fn hit(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }

        fn get(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct Misconfigured;

    impl Interaction for Misconfigured {
        fn prepare(_cx: &Preparation) -> Result<Self> {
            Err(anyhow::anyhow!("misconfigured dependency").into())
        }
    }

    impl TaskInteraction<()> for Misconfigured {
        fn invoke(&self, _param: ()) -> Result<()> {
            Ok(())
        }
    }

    struct Never;

    impl Interaction for Never {
        fn prepare(cx: &Preparation) -> Result<Self> {
            cx.ability::<Counter>()?.hit();
            Ok(Never)
        }
    }

    impl TaskInteraction<()> for Never {
        fn invoke(&self, _param: ()) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_non_ability_errors_abort_resolution() {
        let counter = Counter::default();
        let actor = Actor::new(Abilities::new().with(counter.clone()));
        let task = Task::<()>::of::<Misconfigured>().or::<Never>();

        let err = actor.perform(&task, ()).unwrap_err();
        assert!(matches!(err, Error::Interaction(_)));
        assert!(err.to_string().contains("misconfigured dependency"));
        // The later candidate was never constructed.
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_scope_closes_after_resolution() {
        let scope = Scope::open();
        let cx = Preparation {
            actor: Actor::new(Abilities::new().with(Counter::default())),
            open: scope.flag(),
        };
        assert!(cx.ability::<Counter>().is_ok());
        drop(scope);
        assert!(matches!(cx.ability::<Counter>(), Err(Error::AbilityRequest)));
    }

    #[test]
    fn test_empty_task_is_unsupported() {
        let actor = Actor::new(Abilities::new());
        let err = actor
            .prepare::<dyn TaskInteraction<()>>(&[])
            .map(|_| ())
            .unwrap_err();
        match err {
            Error::UnsupportedTask { interactions } => assert!(interactions.is_empty()),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_debug_shows_name_and_abilities() {
        let actor = Actor::named("alice", Abilities::new().with(Counter::default()));
        assert_eq!(
            format!("{:?}", actor),
            r#"Actor { name: "alice", abilities: ["Counter"] }"#
        );
    }
}
