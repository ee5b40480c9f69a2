//! Named tasks and questions that scenario files can refer to

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;

use screenplay_core::{Error, Question, Task};

use crate::error::{E2eError, E2eResult};

/// Registry of JSON-typed tasks and questions.
///
/// Registered descriptors are adapted so their parameters are decoded from
/// the scenario's JSON and their answers encoded back into JSON.
#[derive(Default, Clone)]
pub struct Repertoire {
    tasks: BTreeMap<String, Task<Value>>,
    questions: BTreeMap<String, Question<Value, Value>>,
}

impl Repertoire {
    pub fn new() -> Self {
        Self::default()
    }

    /// A repertoire holding the built-in browser interactions.
    pub fn browser() -> Self {
        use screenplay_browser::web;

        let mut repertoire = Self::new();
        repertoire
            .task("visit", web::visit())
            .task("click", web::click())
            .task("fill", web::fill())
            .task("browse", web::browse())
            .question("read_texts", web::read_texts())
            .question("count_elements", web::count_elements())
            .question("attribute_of", web::attribute_of())
            .question("current_url", web::current_url())
            .question("page_title", web::page_title());
        repertoire
    }

    /// Register a task under `name`, replacing any previous one.
    pub fn task<P>(&mut self, name: impl Into<String>, task: Task<P>) -> &mut Self
    where
        P: DeserializeOwned + 'static,
    {
        let task = task.map_param(decode::<P>);
        self.tasks.insert(name.into(), task);
        self
    }

    /// Register a question under `name`, replacing any previous one.
    pub fn question<P, R>(&mut self, name: impl Into<String>, question: Question<P, R>) -> &mut Self
    where
        P: DeserializeOwned + 'static,
        R: Into<Value> + 'static,
    {
        let question = question.map(decode::<P>, |answer: R| answer.into());
        self.questions.insert(name.into(), question);
        self
    }

    pub fn get_task(&self, name: &str) -> E2eResult<&Task<Value>> {
        self.tasks
            .get(name)
            .ok_or_else(|| E2eError::UnknownTask(name.to_string()))
    }

    pub fn get_question(&self, name: &str) -> E2eResult<&Question<Value, Value>> {
        self.questions
            .get(name)
            .ok_or_else(|| E2eError::UnknownQuestion(name.to_string()))
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    pub fn question_names(&self) -> impl Iterator<Item = &str> {
        self.questions.keys().map(String::as_str)
    }
}

fn decode<P: DeserializeOwned>(value: Value) -> screenplay_core::Result<P> {
    serde_json::from_value(value).map_err(Error::interaction)
}
