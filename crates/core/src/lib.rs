//! Screenplay Core
//!
//! Actors hold abilities, perform tasks and answer questions. A task or
//! question is an ordered list of candidate interactions; the actor picks the
//! first candidate whose constructor finds every ability it asks for.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Actor                                                      │
//! │    ├── abilities: [Ability]          (first match wins)     │
//! │    ├── perform(task, param)                                 │
//! │    └── ask(question, param, assert)                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Task<P> / Question<P, R>                                   │
//! │    └── candidates: [Interaction]     (declared priority)    │
//! │          ├── prepare(&Preparation) -> Self                  │
//! │          └── invoke(param [, assert])                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use screenplay_core::{Abilities, Actor, Interaction, Preparation, Task, TaskInteraction};
//!
//! struct Greet;
//!
//! impl Greet {
//!     fn hello(&self, name: &str) -> String {
//!         format!("Hello, {name}!")
//!     }
//! }
//!
//! struct SayHello {
//!     greet: Arc<Greet>,
//! }
//!
//! impl Interaction for SayHello {
//!     fn prepare(cx: &Preparation) -> screenplay_core::Result<Self> {
//!         Ok(Self { greet: cx.ability::<Greet>()? })
//!     }
//! }
//!
//! impl TaskInteraction<&'static str> for SayHello {
//!     fn invoke(&self, name: &'static str) -> screenplay_core::Result<()> {
//!         println!("{}", self.greet.hello(name));
//!         Ok(())
//!     }
//! }
//!
//! let actor = Actor::new(Abilities::new().with(Greet));
//! actor.perform(&Task::of::<SayHello>(), "world").unwrap();
//! ```

pub mod ability;
pub mod actor;
pub mod error;
pub mod interaction;
pub mod question;
pub mod task;

pub use ability::{Abilities, Ability};
pub use actor::{Actor, Preparation};
pub use error::{Error, Result};
pub use interaction::{Candidate, Interaction};
pub use question::{Assertion, Question, QuestionInteraction};
pub use task::{Task, TaskInteraction};
