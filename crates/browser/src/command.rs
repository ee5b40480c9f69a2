//! Browser commands and queries queued by interactions

use serde::{Deserialize, Serialize};

/// A side-effecting browser command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BrowserCommand {
    /// Navigate to a URL (relative to base)
    Navigate {
        url: String,
        #[serde(default)]
        wait_for_selector: Option<String>,
    },

    /// Click an element
    Click {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
    },

    /// Fill an input field
    Fill {
        selector: String,
        value: String,
        #[serde(default)]
        clear_first: bool,
    },

    /// Type text with keyboard simulation
    Type {
        selector: String,
        text: String,
        #[serde(default)]
        delay_ms: Option<u64>,
    },

    /// Press a key
    Press {
        #[serde(default)]
        selector: Option<String>,
        key: String,
    },

    /// Wait for an element to reach a state
    Wait {
        selector: String,
        #[serde(default = "default_wait_timeout")]
        timeout_ms: u64,
        #[serde(default)]
        state: WaitState,
    },

    /// Wait for a fixed amount of time (use sparingly)
    Sleep { ms: u64 },

    /// Take a screenshot
    Screenshot {
        name: String,
        #[serde(default)]
        selector: Option<String>,
        #[serde(default)]
        full_page: bool,
    },

    Hover { selector: String },

    Focus { selector: String },

    /// Select an option from a dropdown
    Select { selector: String, value: String },

    Check { selector: String },

    Uncheck { selector: String },

    /// Execute custom JavaScript, discarding the result
    Evaluate { script: String },

    /// Log a message from inside the browser script
    Log { message: String },
}

fn default_wait_timeout() -> u64 {
    5000
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl WaitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        }
    }
}

/// A read from the page whose JSON answer is handed back to a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    /// Text content of every element matching the selector
    Texts { selector: String },

    /// Number of elements matching the selector
    Count { selector: String },

    /// Attribute of the first matching element (null when absent)
    Attribute { selector: String, name: String },

    /// Current page URL
    Url,

    /// Current page title
    Title,

    /// Result of a JavaScript expression body
    Evaluate { script: String },
}

/// One queued unit of browser work
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Command(BrowserCommand),
    Query(Query),
}

impl BrowserCommand {
    /// Short label used in logs and results
    pub fn name(&self) -> String {
        match self {
            BrowserCommand::Navigate { url, .. } => format!("navigate:{}", url),
            BrowserCommand::Click { selector, .. } => format!("click:{}", selector),
            BrowserCommand::Fill { selector, .. } => format!("fill:{}", selector),
            BrowserCommand::Type { selector, .. } => format!("type:{}", selector),
            BrowserCommand::Press { key, .. } => format!("press:{}", key),
            BrowserCommand::Wait { selector, .. } => format!("wait:{}", selector),
            BrowserCommand::Sleep { ms } => format!("sleep:{}ms", ms),
            BrowserCommand::Screenshot { name, .. } => format!("screenshot:{}", name),
            BrowserCommand::Hover { selector } => format!("hover:{}", selector),
            BrowserCommand::Focus { selector } => format!("focus:{}", selector),
            BrowserCommand::Select { selector, .. } => format!("select:{}", selector),
            BrowserCommand::Check { selector } => format!("check:{}", selector),
            BrowserCommand::Uncheck { selector } => format!("uncheck:{}", selector),
            BrowserCommand::Evaluate { .. } => "evaluate".to_string(),
            BrowserCommand::Log { message } => {
                format!("log:{}", message.chars().take(30).collect::<String>())
            }
        }
    }
}

impl Query {
    pub fn name(&self) -> String {
        match self {
            Query::Texts { selector } => format!("texts:{}", selector),
            Query::Count { selector } => format!("count:{}", selector),
            Query::Attribute { selector, name } => format!("attribute:{}@{}", selector, name),
            Query::Url => "url".to_string(),
            Query::Title => "title".to_string(),
            Query::Evaluate { .. } => "evaluate?".to_string(),
        }
    }
}

impl Instruction {
    pub fn name(&self) -> String {
        match self {
            Instruction::Command(command) => command.name(),
            Instruction::Query(query) => query.name(),
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Instruction::Query(_))
    }
}
