//! Screenplay E2E
//!
//! Runs screenplay actors from test code and from declarative YAML
//! scenarios:
//! - A [`Stage`] holds the current actor and the browser it drives; asking
//!   returns an [`Answer`] that resolves once the browser queue is flushed
//! - A [`Repertoire`] names the tasks and questions scenarios may use
//! - The [`ScenarioRunner`] plays scenario files and records the results
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  ScenarioRunner                                             │
//! │    ├── run_all / run_tagged / run_named -> SuiteResult      │
//! │    └── write_results -> test-results.json                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Stage                                                      │
//! │    ├── initiate_actor(actor)                                │
//! │    ├── perform(task, param)                                 │
//! │    ├── ask(question, param) -> Answer<R>                    │
//! │    └── flush() -> answers delivered                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Scenario (YAML)                                            │
//! │    ├── name, description, tags                              │
//! │    └── steps: [Step]                                        │
//! │          ├── perform { task, param }                        │
//! │          ├── ask { question, param, expect? }               │
//! │          └── log { message }                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod repertoire;
pub mod runner;
pub mod scenario;
pub mod stage;

pub use error::{E2eError, E2eResult};
pub use repertoire::Repertoire;
pub use runner::{RunnerConfig, ScenarioResult, ScenarioRunner, StepResult, SuiteResult};
pub use scenario::{Expectation, Scenario, Step};
pub use stage::{Answer, Stage};
