//! Built-in browser tasks and questions

use serde::{Deserialize, Serialize};

use screenplay_core::{
    Assertion, Interaction, Preparation, Question, QuestionInteraction, Result, Task,
    TaskInteraction,
};

use crate::command::{BrowserCommand, Query};
use crate::interaction::BrowserInteraction;

/// Parameter of [`fill`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillIn {
    pub selector: String,
    pub value: String,
}

/// Parameter of [`attribute_of`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeQuery {
    pub selector: String,
    pub name: String,
}

macro_rules! browser_interaction {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub struct $name(BrowserInteraction);

            impl Interaction for $name {
                fn prepare(cx: &Preparation) -> Result<Self> {
                    BrowserInteraction::prepare(cx).map(Self)
                }
            }
        )*
    };
}

browser_interaction! {
    /// Navigates to a URL relative to the base URL.
    Visit,
    Click,
    /// Clears an input and fills it.
    Fill,
    /// Runs any browser command.
    Browse,
    /// Text content of every element matching a selector.
    ReadTexts,
    CountElements,
    /// An attribute of the first matching element, `None` when absent.
    AttributeOf,
    CurrentUrl,
    PageTitle,
}

impl TaskInteraction<String> for Visit {
    fn invoke(&self, url: String) -> Result<()> {
        self.0.browser().run(BrowserCommand::Navigate {
            url,
            wait_for_selector: None,
        });
        Ok(())
    }
}

impl TaskInteraction<String> for Click {
    fn invoke(&self, selector: String) -> Result<()> {
        self.0.browser().run(BrowserCommand::Click {
            selector,
            timeout_ms: None,
        });
        Ok(())
    }
}

impl TaskInteraction<FillIn> for Fill {
    fn invoke(&self, param: FillIn) -> Result<()> {
        self.0.browser().run(BrowserCommand::Fill {
            selector: param.selector,
            value: param.value,
            clear_first: true,
        });
        Ok(())
    }
}

impl TaskInteraction<BrowserCommand> for Browse {
    fn invoke(&self, command: BrowserCommand) -> Result<()> {
        self.0.browser().run(command);
        Ok(())
    }
}

impl QuestionInteraction<String, Vec<String>> for ReadTexts {
    fn invoke(&self, selector: String, assert: Assertion<Vec<String>>) -> Result<()> {
        self.0
            .browser()
            .query_as(Query::Texts { selector }, move |texts: Vec<String>| {
                assert(texts)
            });
        Ok(())
    }
}

impl QuestionInteraction<String, usize> for CountElements {
    fn invoke(&self, selector: String, assert: Assertion<usize>) -> Result<()> {
        self.0
            .browser()
            .query_as(Query::Count { selector }, move |n: usize| assert(n));
        Ok(())
    }
}

impl QuestionInteraction<AttributeQuery, Option<String>> for AttributeOf {
    fn invoke(&self, param: AttributeQuery, assert: Assertion<Option<String>>) -> Result<()> {
        let query = Query::Attribute {
            selector: param.selector,
            name: param.name,
        };
        self.0
            .browser()
            .query_as(query, move |value: Option<String>| assert(value));
        Ok(())
    }
}

impl QuestionInteraction<(), String> for CurrentUrl {
    fn invoke(&self, _: (), assert: Assertion<String>) -> Result<()> {
        self.0
            .browser()
            .query_as(Query::Url, move |url: String| assert(url));
        Ok(())
    }
}

impl QuestionInteraction<(), String> for PageTitle {
    fn invoke(&self, _: (), assert: Assertion<String>) -> Result<()> {
        self.0
            .browser()
            .query_as(Query::Title, move |title: String| assert(title));
        Ok(())
    }
}

pub fn visit() -> Task<String> {
    Task::of::<Visit>()
}

pub fn click() -> Task<String> {
    Task::of::<Click>()
}

pub fn fill() -> Task<FillIn> {
    Task::of::<Fill>()
}

pub fn browse() -> Task<BrowserCommand> {
    Task::of::<Browse>()
}

pub fn read_texts() -> Question<String, Vec<String>> {
    Question::of::<ReadTexts>()
}

pub fn count_elements() -> Question<String, usize> {
    Question::of::<CountElements>()
}

pub fn attribute_of() -> Question<AttributeQuery, Option<String>> {
    Question::of::<AttributeOf>()
}

pub fn current_url() -> Question<(), String> {
    Question::of::<CurrentUrl>()
}

pub fn page_title() -> Question<(), String> {
    Question::of::<PageTitle>()
}
