//! Error types for actors and interaction resolution

use thiserror::Error;

/// Result type alias using the screenplay Error
pub type Result<T> = std::result::Result<T, Error>;

/// Screenplay error types
#[derive(Error, Debug)]
pub enum Error {
    /// An ability was requested through a lookup handle whose resolution
    /// already finished.
    #[error("Abilities may only be requested in interaction constructors")]
    AbilityRequest,

    /// The actor does not hold the requested ability. The resolver treats
    /// this as "candidate not supported".
    #[error("Missing ability: {ability}")]
    MissingAbility { ability: &'static str },

    #[error(
        "None of the interaction options is supported by the current actor: {}",
        .interactions.join(", ")
    )]
    UnsupportedTask { interactions: Vec<String> },

    #[error("Interaction failed: {0}")]
    Interaction(#[from] anyhow::Error),
}

impl Error {
    /// Wrap any error raised by an interaction.
    pub fn interaction<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Interaction(anyhow::Error::new(err))
    }

    pub fn is_missing_ability(&self) -> bool {
        matches!(self, Error::MissingAbility { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_task_lists_candidates_in_order() {
        let err = Error::UnsupportedTask {
            interactions: vec!["UseAInteraction".into(), "UseBInteraction".into()],
        };
        assert_eq!(
            err.to_string(),
            "None of the interaction options is supported by the current actor: UseAInteraction, UseBInteraction"
        );
    }

    #[test]
    fn interaction_errors_keep_their_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = Error::interaction(io);
        assert!(err.to_string().contains("disk on fire"));
        assert!(!err.is_missing_ability());
    }
}
