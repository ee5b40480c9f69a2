//! Scenario runner tests against the recording driver

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use screenplay_browser::{
    task, BrowseTheWeb, BrowserCommand, Driver, Instruction, Query, RecordingDriver,
};
use screenplay_core::{Abilities, Actor};
use screenplay_e2e::{
    E2eError, Repertoire, RunnerConfig, Scenario, ScenarioRunner, Stage, SuiteResult,
};

fn list_page_driver() -> Arc<RecordingDriver> {
    Arc::new(RecordingDriver::new(|query| match query {
        Query::Texts { selector } if selector == "li" => json!(["A", "B", "C"]),
        Query::Count { selector } if selector == "li" => json!(3),
        Query::Title => json!("Test page"),
        _ => Value::Null,
    }))
}

fn write_scenario(dir: &Path, file: &str, yaml: &str) {
    std::fs::write(dir.join(file), yaml).unwrap();
}

fn runner_in(dir: &TempDir, driver: &Arc<RecordingDriver>) -> ScenarioRunner {
    let config = RunnerConfig {
        scenarios_dir: dir.path().join("scenarios"),
        output_dir: dir.path().join("results"),
        ..Default::default()
    };
    let browser = Arc::new(BrowseTheWeb::new(Arc::clone(driver) as Arc<dyn Driver>));
    ScenarioRunner::with_config(config).with_stage(Stage::new(browser))
}

fn scenarios_dir(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("scenarios");
    std::fs::create_dir_all(&path).unwrap();
    path
}

const LIST_PAGE: &str = r#"
name: list-page
tags: [smoke]
steps:
  - action: perform
    task: visit
    param: /test.html
  - action: ask
    question: read_texts
    param: li
    expect:
      contains: B
  - action: ask
    question: count_elements
    param: li
    expect:
      equals: 3
  - action: log
    message: list checked
"#;

const WRONG_TITLE: &str = r#"
name: wrong-title
steps:
  - action: perform
    task: visit
    param: /
  - action: ask
    question: page_title
    expect:
      equals: Another page
"#;

const UNKNOWN_TASK: &str = r##"
name: unknown-task
tags: [smoke]
steps:
  - action: perform
    task: visit
    param: /
  - action: perform
    task: teleport
  - action: perform
    task: click
    param: "#never"
"##;

#[tokio::test]
async fn runs_all_scenarios_in_file_order() {
    let dir = TempDir::new().unwrap();
    let scenarios = scenarios_dir(&dir);
    write_scenario(&scenarios, "a_list.yaml", LIST_PAGE);
    write_scenario(&scenarios, "b_title.yml", WRONG_TITLE);
    write_scenario(&scenarios, "notes.txt", "not a scenario");
    let driver = list_page_driver();
    let runner = runner_in(&dir, &driver);

    let suite = runner.run_all().await.unwrap();

    assert_eq!(suite.total, 2);
    assert_eq!(suite.passed, 1);
    assert_eq!(suite.failed, 1);
    assert_eq!(suite.results[0].name, "list-page");
    assert!(suite.results[0].success);
    assert_eq!(suite.results[0].steps[1].answer, Some(json!(["A", "B", "C"])));

    let failed = &suite.results[1];
    assert!(!failed.success);
    assert_eq!(
        failed.error.as_deref(),
        Some(r#"ask:page_title: Expectation failed for page_title: expected "Another page", got "Test page""#)
    );
    assert_eq!(failed.steps[1].answer, Some(json!("Test page")));
}

#[tokio::test]
async fn stops_at_first_failed_step_but_flushes_earlier_steps() {
    let dir = TempDir::new().unwrap();
    write_scenario(&scenarios_dir(&dir), "unknown.yaml", UNKNOWN_TASK);
    let driver = list_page_driver();
    let runner = runner_in(&dir, &driver);

    let result = runner.run_named("unknown-task").await.unwrap();

    assert!(!result.success);
    assert_eq!(result.steps.len(), 2);
    assert_eq!(result.steps[1].error.as_deref(), Some("Unknown task: teleport"));
    assert_eq!(
        driver.instructions(),
        vec![Instruction::Command(BrowserCommand::Navigate {
            url: "/".into(),
            wait_for_selector: None,
        })]
    );
}

#[tokio::test]
async fn runs_only_tagged_scenarios() {
    let dir = TempDir::new().unwrap();
    let scenarios = scenarios_dir(&dir);
    write_scenario(&scenarios, "list.yaml", LIST_PAGE);
    write_scenario(&scenarios, "title.yaml", WRONG_TITLE);
    let driver = list_page_driver();
    let runner = runner_in(&dir, &driver);

    let suite = runner.run_tagged("smoke").await.unwrap();

    assert_eq!(suite.total, 1);
    assert_eq!(suite.results[0].name, "list-page");
}

#[tokio::test]
async fn missing_scenario_name_is_an_error() {
    let dir = TempDir::new().unwrap();
    scenarios_dir(&dir);
    let runner = runner_in(&dir, &list_page_driver());

    let err = runner.run_named("nope").await.unwrap_err();

    assert!(matches!(err, E2eError::SpecParse(msg) if msg.contains("nope")));
}

#[tokio::test]
async fn custom_tasks_join_the_repertoire() {
    let dir = TempDir::new().unwrap();
    write_scenario(
        &scenarios_dir(&dir),
        "login.yaml",
        r#"
name: login
steps:
  - action: perform
    task: log_in
    param: alice
"#,
    );
    let driver = list_page_driver();
    let mut runner = runner_in(&dir, &driver);
    runner.repertoire_mut().task(
        "log_in",
        task("LogIn", |browser, user: String| {
            browser
                .run(BrowserCommand::Navigate {
                    url: "/login".into(),
                    wait_for_selector: None,
                })
                .run(BrowserCommand::Fill {
                    selector: "#user".into(),
                    value: user,
                    clear_first: true,
                });
            Ok(())
        }),
    );

    let suite = runner.run_all().await.unwrap();

    assert_eq!(suite.passed, 1);
    assert_eq!(driver.instructions().len(), 2);
}

#[tokio::test]
async fn undecodable_param_fails_the_step() {
    let dir = TempDir::new().unwrap();
    write_scenario(
        &scenarios_dir(&dir),
        "bad.yaml",
        r#"
name: bad-param
steps:
  - action: perform
    task: fill
    param: just-a-string
"#,
    );
    let runner = runner_in(&dir, &list_page_driver());

    let suite = runner.run_all().await.unwrap();

    assert_eq!(suite.failed, 1);
    let error = suite.results[0].error.as_deref().unwrap();
    assert!(error.starts_with("perform:fill: Screenplay error: Interaction failed:"));
}

#[tokio::test]
async fn actor_without_browser_cannot_perform_browser_tasks() {
    let dir = TempDir::new().unwrap();
    scenarios_dir(&dir);
    let mut runner = runner_in(&dir, &list_page_driver());
    runner
        .stage_mut()
        .initiate_actor(Actor::named("offline", Abilities::new()));
    let scenario = Scenario::from_yaml(WRONG_TITLE).unwrap();

    let result = runner.run_scenario(&scenario).await;

    assert!(!result.success);
    assert_eq!(
        result.error.as_deref(),
        Some("perform:visit: Screenplay error: None of the interaction options is supported by the current actor: Visit")
    );
}

#[tokio::test]
async fn results_are_written_as_json() {
    let dir = TempDir::new().unwrap();
    write_scenario(&scenarios_dir(&dir), "list.yaml", LIST_PAGE);
    let runner = runner_in(&dir, &list_page_driver());

    let suite = runner.run_all().await.unwrap();
    let path = runner.write_results(&suite).unwrap();

    assert_eq!(path, dir.path().join("results").join("test-results.json"));
    let written: SuiteResult =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written.passed, 1);
    assert_eq!(written.results[0].steps.len(), 4);
}

#[test]
fn browser_repertoire_covers_builtins() {
    let repertoire = Repertoire::browser();
    assert_eq!(
        repertoire.question_names().collect::<Vec<_>>(),
        vec![
            "attribute_of",
            "count_elements",
            "current_url",
            "page_title",
            "read_texts"
        ]
    );
}
