//! Screenplay Browser
//!
//! Gives actors a browser. Interactions queue commands and queries on the
//! [`BrowseTheWeb`] ability; [`BrowseTheWeb::flush`] runs the queue through a
//! [`Driver`] (Playwright by default) and delivers query answers to the
//! question assertions that asked for them.
//!
//! # Example
//!
//! ```no_run
//! use screenplay_browser::{default_actor, read_texts, visit};
//!
//! let actor = default_actor();
//! actor
//!     .perform(&visit(), "/test.html".to_string())?
//!     .ask(&read_texts(), "li".to_string(), |items| {
//!         assert_eq!(items, vec!["A", "B"]);
//!     })?;
//! # Ok::<(), screenplay_core::Error>(())
//! ```

pub mod ability;
pub mod command;
pub mod driver;
pub mod error;
pub mod interaction;
pub mod playwright;
pub mod web;

use screenplay_core::{Abilities, Actor};

pub use ability::{BrowseTheWeb, Flushed};
pub use command::{BrowserCommand, Instruction, Query, WaitState};
pub use driver::{Driver, RecordingDriver};
pub use error::{BrowserError, BrowserResult};
pub use interaction::{question, task, BrowserInteraction};
pub use playwright::{Browser, PlaywrightConfig, PlaywrightDriver};
pub use web::{
    attribute_of, browse, click, count_elements, current_url, fill, page_title, read_texts, visit,
    AttributeQuery, FillIn,
};

/// An actor holding a Playwright-backed [`BrowseTheWeb`].
pub fn default_actor() -> Actor {
    actor(Abilities::new())
}

/// An actor with the given abilities, or with the default browser when the
/// set is empty.
///
/// An explicitly empty set is treated like no set at all and still gets the
/// default browser, so this cannot build an actor without abilities. Use
/// [`Actor::new`] for that.
pub fn actor(abilities: Abilities) -> Actor {
    if abilities.is_empty() {
        Actor::new(Abilities::new().with(BrowseTheWeb::default()))
    } else {
        Actor::new(abilities)
    }
}
