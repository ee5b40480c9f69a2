//! Declarative YAML scenarios

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{E2eError, E2eResult};

/// A scenario parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique name for this scenario
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Tags for filtering scenarios
    #[serde(default)]
    pub tags: Vec<String>,

    /// Steps to execute in order
    pub steps: Vec<Step>,
}

/// A single step in a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Perform a task from the repertoire
    Perform {
        task: String,
        #[serde(default)]
        param: Value,
    },

    /// Ask a question from the repertoire and check its answer
    Ask {
        question: String,
        #[serde(default)]
        param: Value,
        #[serde(default)]
        expect: Option<Expectation>,
    },

    /// Log a message (for debugging)
    Log { message: String },
}

impl Step {
    /// Short label used in logs and results
    pub fn name(&self) -> String {
        match self {
            Step::Perform { task, .. } => format!("perform:{}", task),
            Step::Ask { question, .. } => format!("ask:{}", question),
            Step::Log { .. } => "log".to_string(),
        }
    }
}

/// What an answer must look like
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The answer equals this value exactly
    Equals(Value),

    /// The answer (an array or a string) contains this value
    Contains(Value),

    /// The answer is not null, `""`, `[]` or `{}`
    NotEmpty,
}

impl Expectation {
    /// Check an answer, describing the mismatch on failure.
    pub fn check(&self, answer: &Value) -> Result<(), String> {
        match self {
            Expectation::Equals(expected) => {
                if answer == expected {
                    Ok(())
                } else {
                    Err(format!("expected {}, got {}", expected, answer))
                }
            }
            Expectation::Contains(needle) => {
                let found = match (answer, needle) {
                    (Value::Array(items), _) => items.contains(needle),
                    (Value::String(haystack), Value::String(needle)) => {
                        haystack.contains(needle.as_str())
                    }
                    _ => false,
                };
                if found {
                    Ok(())
                } else {
                    Err(format!("{} does not contain {}", answer, needle))
                }
            }
            Expectation::NotEmpty => {
                let empty = match answer {
                    Value::Null => true,
                    Value::String(s) => s.is_empty(),
                    Value::Array(items) => items.is_empty(),
                    Value::Object(map) => map.is_empty(),
                    _ => false,
                };
                if empty {
                    Err(format!("expected a non-empty answer, got {}", answer))
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl Scenario {
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        serde_yaml::from_str(yaml).map_err(E2eError::from)
    }

    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
            .map_err(|e| E2eError::SpecParse(format!("{}: {}", path.display(), e)))
    }

    /// Load all scenarios from a directory, in path order
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut scenarios = Vec::new();

        for entry in walkdir::WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
        {
            scenarios.push(Self::from_file(entry.path())?);
        }

        Ok(scenarios)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_parse_scenario() {
        let yaml = r#"
name: list-page
description: Reads the list on the test page
tags:
  - smoke
steps:
  - action: perform
    task: visit
    param: /test.html
  - action: ask
    question: read_texts
    param: li
    expect:
      contains: A
  - action: ask
    question: current_url
    expect: not_empty
  - action: log
    message: done
"#;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert_eq!(scenario.name, "list-page");
        assert!(scenario.has_tag("smoke"));
        assert_eq!(scenario.steps.len(), 4);
        assert_eq!(
            scenario.steps[1],
            Step::Ask {
                question: "read_texts".into(),
                param: json!("li"),
                expect: Some(Expectation::Contains(json!("A"))),
            }
        );
        assert_eq!(
            scenario.steps[2],
            Step::Ask {
                question: "current_url".into(),
                param: Value::Null,
                expect: Some(Expectation::NotEmpty),
            }
        );
    }

    #[test]
    fn test_parse_structured_param() {
        let yaml = r##"
name: login
steps:
  - action: perform
    task: fill
    param:
      selector: "#user"
      value: alice
"##;
        let scenario = Scenario::from_yaml(yaml).unwrap();
        assert_eq!(
            scenario.steps[0],
            Step::Perform {
                task: "fill".into(),
                param: json!({ "selector": "#user", "value": "alice" }),
            }
        );
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        let yaml = "name: bad\nsteps:\n  - action: teleport\n";
        assert!(Scenario::from_yaml(yaml).is_err());
    }

    #[test_case(Expectation::Equals(json!(3)), json!(3) => true; "equals")]
    #[test_case(Expectation::Equals(json!(3)), json!("3") => false; "equals is typed")]
    #[test_case(Expectation::Contains(json!("B")), json!(["A", "B"]) => true; "array contains")]
    #[test_case(Expectation::Contains(json!("lo")), json!("hello") => true; "substring")]
    #[test_case(Expectation::Contains(json!("z")), json!(7) => false; "number never contains")]
    #[test_case(Expectation::NotEmpty, json!([]) => false; "empty array")]
    #[test_case(Expectation::NotEmpty, json!(null) => false; "null")]
    #[test_case(Expectation::NotEmpty, json!(0) => true; "zero counts as an answer")]
    fn test_expectations(expectation: Expectation, answer: Value) -> bool {
        expectation.check(&answer).is_ok()
    }
}
