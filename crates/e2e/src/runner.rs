//! Scenario runner: plays YAML scenarios on a stage

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use screenplay_browser::PlaywrightConfig;

use crate::error::{E2eError, E2eResult};
use crate::repertoire::Repertoire;
use crate::scenario::{Expectation, Scenario, Step};
use crate::stage::{Answer, Stage};

/// Result of one step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step: String,
    pub success: bool,
    #[serde(default)]
    pub answer: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

/// Result of running a set of scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<ScenarioResult>,
}

impl SuiteResult {
    pub fn from_results(results: Vec<ScenarioResult>, duration_ms: u64) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            duration_ms,
            results,
        }
    }
}

/// Configuration for the scenario runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub playwright: PlaywrightConfig,
    pub scenarios_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            playwright: PlaywrightConfig::default(),
            scenarios_dir: PathBuf::from("tests/scenarios"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

/// An ask step waiting for the browser to answer
struct PendingAnswer {
    step: usize,
    question: String,
    answer: Answer<Value>,
    expect: Option<Expectation>,
}

/// Runs scenarios step by step against a stage
pub struct ScenarioRunner {
    stage: Stage,
    repertoire: Repertoire,
    scenarios_dir: PathBuf,
    output_dir: PathBuf,
}

impl ScenarioRunner {
    /// Create a runner with the default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// A Playwright-backed stage with the built-in browser repertoire
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            stage: Stage::with_playwright(config.playwright),
            repertoire: Repertoire::browser(),
            scenarios_dir: config.scenarios_dir,
            output_dir: config.output_dir,
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.stage = stage;
        self
    }

    pub fn with_repertoire(mut self, repertoire: Repertoire) -> Self {
        self.repertoire = repertoire;
        self
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn repertoire_mut(&mut self) -> &mut Repertoire {
        &mut self.repertoire
    }

    /// Run every scenario in the scenarios directory
    pub async fn run_all(&self) -> E2eResult<SuiteResult> {
        let scenarios = Scenario::load_all(&self.scenarios_dir)?;
        self.run_scenarios(&scenarios).await
    }

    /// Run scenarios carrying a tag
    pub async fn run_tagged(&self, tag: &str) -> E2eResult<SuiteResult> {
        let scenarios: Vec<Scenario> = Scenario::load_all(&self.scenarios_dir)?
            .into_iter()
            .filter(|s| s.has_tag(tag))
            .collect();
        self.run_scenarios(&scenarios).await
    }

    /// Run a specific scenario by name
    pub async fn run_named(&self, name: &str) -> E2eResult<ScenarioResult> {
        let scenario = Scenario::load_all(&self.scenarios_dir)?
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::SpecParse(format!("Scenario not found: {}", name)))?;
        Ok(self.run_scenario(&scenario).await)
    }

    pub async fn run_scenarios(&self, scenarios: &[Scenario]) -> E2eResult<SuiteResult> {
        let start = Instant::now();
        let mut results = Vec::with_capacity(scenarios.len());

        info!("Running {} scenario(s)...", scenarios.len());

        for scenario in scenarios {
            let result = self.run_scenario(scenario).await;
            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let suite = SuiteResult::from_results(results, start.elapsed().as_millis() as u64);
        info!(
            "Scenario results: {} passed, {} failed ({} ms)",
            suite.passed, suite.failed, suite.duration_ms
        );
        Ok(suite)
    }

    /// Run one scenario.
    ///
    /// Steps run until the first failure. Whatever was queued is then
    /// flushed and the answers of earlier ask steps are checked in order.
    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioResult {
        let start = Instant::now();
        debug!("Running scenario: {}", scenario.name);

        let mut steps = Vec::with_capacity(scenario.steps.len());
        let mut pending = Vec::new();
        let mut failure: Option<String> = None;

        for step in &scenario.steps {
            let mut result = StepResult {
                step: step.name(),
                success: true,
                answer: None,
                error: None,
            };
            match self.run_step(scenario, step) {
                Ok(Some((question, answer, expect))) => pending.push(PendingAnswer {
                    step: steps.len(),
                    question,
                    answer,
                    expect,
                }),
                Ok(None) => {}
                Err(e) => {
                    result.success = false;
                    result.error = Some(e.to_string());
                    failure = Some(format!("{}: {}", result.step, e));
                }
            }
            steps.push(result);
            if failure.is_some() {
                break;
            }
        }

        match self.stage.flush().await {
            Ok(flushed) => {
                debug!(
                    "Flushed {} instruction(s) in {} ms",
                    flushed.instructions.len(),
                    flushed.duration_ms
                );
                for pending in pending {
                    let step = &mut steps[pending.step];
                    match check_answer(pending).await {
                        Ok(answer) => step.answer = Some(answer),
                        Err((answer, e)) => {
                            step.answer = answer;
                            step.success = false;
                            step.error = Some(e.to_string());
                            failure.get_or_insert_with(|| format!("{}: {}", step.step, e));
                        }
                    }
                }
            }
            Err(e) => {
                warn!("Flush failed for {}: {}", scenario.name, e);
                failure.get_or_insert_with(|| format!("flush: {}", e));
            }
        }

        ScenarioResult {
            name: scenario.name.clone(),
            success: failure.is_none(),
            duration_ms: start.elapsed().as_millis() as u64,
            steps,
            error: failure,
        }
    }

    /// Execute one step; ask steps hand back their pending answer.
    fn run_step(
        &self,
        scenario: &Scenario,
        step: &Step,
    ) -> E2eResult<Option<(String, Answer<Value>, Option<Expectation>)>> {
        match step {
            Step::Perform { task, param } => {
                let task = self.repertoire.get_task(task)?;
                self.stage.perform(task, param.clone())?;
                Ok(None)
            }
            Step::Ask {
                question,
                param,
                expect,
            } => {
                let descriptor = self.repertoire.get_question(question)?;
                let answer = self.stage.ask(descriptor, param.clone())?;
                Ok(Some((question.clone(), answer, expect.clone())))
            }
            Step::Log { message } => {
                info!("[{}] {}", scenario.name, message);
                Ok(None)
            }
        }
    }

    /// Write suite results to `test-results.json` in the output directory
    pub fn write_results(&self, results: &SuiteResult) -> E2eResult<PathBuf> {
        write_results(&self.output_dir, results)
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve an answer and hold it against its expectation
async fn check_answer(pending: PendingAnswer) -> Result<Value, (Option<Value>, E2eError)> {
    let answer = pending.answer.resolve().await.map_err(|e| (None, e))?;
    if let Some(expect) = &pending.expect {
        if let Err(reason) = expect.check(&answer) {
            return Err((
                Some(answer),
                E2eError::ExpectationFailed {
                    question: pending.question,
                    reason,
                },
            ));
        }
    }
    Ok(answer)
}

pub fn write_results(output_dir: &Path, results: &SuiteResult) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let path = output_dir.join("test-results.json");
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}
