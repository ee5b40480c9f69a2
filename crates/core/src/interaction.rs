//! Interaction construction and candidate lists

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::actor::Preparation;
use crate::error::Result;

/// Construction half of an interaction.
///
/// `prepare` runs while the actor resolves a task or question. It fetches the
/// abilities the interaction needs from `cx`; returning
/// [`Error::MissingAbility`](crate::Error::MissingAbility) (usually via `?`
/// on [`Preparation::ability`]) marks the interaction as unsupported by the
/// actor. Any other error aborts resolution.
pub trait Interaction: Sized {
    fn prepare(cx: &Preparation) -> Result<Self>;
}

/// One entry in a task or question: a named interaction constructor.
pub struct Candidate<I: ?Sized> {
    name: Cow<'static, str>,
    construct: Arc<dyn Fn(&Preparation) -> Result<Box<I>> + Send + Sync>,
}

impl<I: ?Sized> Candidate<I> {
    pub fn new<F>(name: impl Into<Cow<'static, str>>, construct: F) -> Self
    where
        F: Fn(&Preparation) -> Result<Box<I>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            construct: Arc::new(construct),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn construct(&self, cx: &Preparation) -> Result<Box<I>> {
        (self.construct)(cx)
    }
}

impl<I: ?Sized> Clone for Candidate<I> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            construct: Arc::clone(&self.construct),
        }
    }
}

impl<I: ?Sized> fmt::Debug for Candidate<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Candidate").field(&self.name).finish()
    }
}

/// Type name without its module path, e.g. `Visit` or `Wrapper<my::Inner>`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let head = full.split('<').next().unwrap_or(full);
    match head.rfind("::") {
        Some(idx) => &full[idx + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    struct Wrapper<T>(T);

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Plain>(), "Plain");
        assert_eq!(short_type_name::<u32>(), "u32");
        assert!(short_type_name::<Wrapper<Plain>>().starts_with("Wrapper<"));
    }
}
