//! Abilities held by an actor

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use crate::interaction::short_type_name;

/// Anything an actor can hold as an ability.
///
/// Abilities are matched by their concrete type, so two distinct types never
/// shadow each other even when they share a name.
pub trait Ability: Any + Send + Sync {}

impl<T: Any + Send + Sync> Ability for T {}

#[derive(Clone)]
struct Entry {
    type_id: TypeId,
    name: &'static str,
    instance: Arc<dyn Any + Send + Sync>,
}

/// Ordered ability set of an actor.
///
/// Insertion order is preserved and lookup returns the first entry of the
/// requested type.
#[derive(Clone, Default)]
pub struct Abilities {
    entries: Vec<Entry>,
}

impl Abilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an ability, builder style.
    pub fn with<T: Ability>(mut self, ability: T) -> Self {
        self.push(ability);
        self
    }

    /// Add an ability that is also held elsewhere (e.g. by a test that
    /// wants to inspect it afterwards).
    ///
    /// The entry is registered under `T`, not under `Arc<T>`.
    pub fn with_shared<T: Ability>(mut self, ability: Arc<T>) -> Self {
        self.push_shared(ability);
        self
    }

    pub fn push<T: Ability>(&mut self, ability: T) {
        self.push_shared(Arc::new(ability));
    }

    pub fn push_shared<T: Ability>(&mut self, ability: Arc<T>) {
        self.entries.push(Entry {
            type_id: TypeId::of::<T>(),
            name: short_type_name::<T>(),
            instance: ability,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Type names of the held abilities, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    /// Linear scan for the first ability of type `T`.
    pub(crate) fn find<T: Ability>(&self) -> Option<Arc<T>> {
        let wanted = TypeId::of::<T>();
        self.entries
            .iter()
            .find(|entry| entry.type_id == wanted)
            .and_then(|entry| Arc::clone(&entry.instance).downcast::<T>().ok())
    }
}

impl fmt::Debug for Abilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
