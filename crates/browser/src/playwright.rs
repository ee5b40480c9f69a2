//! Playwright-backed driver
//!
//! Each flush becomes one Node script: the queued instructions run in order
//! against a fresh page, and every query prints its answer on stdout as
//! `__answer__[<index>] <json>`.

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::command::{BrowserCommand, Instruction, Query};
use crate::driver::Driver;
use crate::error::{BrowserError, BrowserResult};

static ANSWER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^__answer__\[(\d+)\] (.*)$").expect("answer pattern is valid")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }

    /// Parse a browser name; unknown names fall back to Chromium.
    pub fn from_name(name: &str) -> Self {
        match name {
            "firefox" => Browser::Firefox,
            "webkit" => Browser::Webkit,
            _ => Browser::Chromium,
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub screenshot_dir: PathBuf,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub browser: Browser,
    pub headless: bool,
    /// Directory node runs in; must be able to `require('playwright')`.
    /// Defaults to the script's temporary directory.
    pub working_dir: Option<PathBuf>,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            viewport_width: 1280,
            viewport_height: 720,
            browser: Browser::Chromium,
            headless: true,
            working_dir: None,
        }
    }
}

/// Runs instruction batches through a generated Playwright script
pub struct PlaywrightDriver {
    config: PlaywrightConfig,
    installed: OnceCell<bool>,
}

impl PlaywrightDriver {
    pub fn new(config: PlaywrightConfig) -> Self {
        Self {
            config,
            installed: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &PlaywrightConfig {
        &self.config
    }

    /// Absolute screenshot directory; scripts run in a temporary directory.
    fn screenshot_dir(&self) -> PathBuf {
        let dir = &self.config.screenshot_dir;
        if dir.is_absolute() {
            return dir.clone();
        }
        std::env::current_dir()
            .map(|cwd| cwd.join(dir))
            .unwrap_or_else(|_| dir.clone())
    }

    /// Check (once) whether Playwright is installed
    async fn check_playwright_installed(&self) -> BrowserResult<()> {
        let installed = *self
            .installed
            .get_or_init(|| async {
                Command::new("npx")
                    .args(["playwright", "--version"])
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .await
                    .map(|status| status.success())
                    .unwrap_or(false)
            })
            .await;

        if installed {
            Ok(())
        } else {
            Err(BrowserError::PlaywrightNotFound)
        }
    }

    /// Build the Playwright script for a batch of instructions
    pub fn build_script(&self, instructions: &[Instruction]) -> String {
        let mut script = String::new();

        script.push_str(&format!(
            r#"
const {{ chromium, firefox, webkit }} = require('playwright');

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();
  const baseUrl = {base_url};

  try {{
"#,
            browser = self.config.browser.as_str(),
            headless = self.config.headless,
            width = self.config.viewport_width,
            height = self.config.viewport_height,
            base_url = js_str(&self.config.base_url),
        ));

        let mut answer_index = 0;
        for (i, instruction) in instructions.iter().enumerate() {
            script.push_str(&format!("\n    // Step {}: {}\n", i + 1, instruction.name()));
            match instruction {
                Instruction::Command(command) => script.push_str(&self.command_to_js(command)),
                Instruction::Query(query) => {
                    script.push_str(&query_to_js(query, answer_index));
                    answer_index += 1;
                }
            }
            script.push('\n');
        }

        script.push_str(
            r#"
  } catch (error) {
    console.error(JSON.stringify({ success: false, error: error.message, stack: error.stack }));
    process.exitCode = 1;
  } finally {
    await browser.close();
  }
})();
"#,
        );

        script
    }

    /// Convert a command to JavaScript code
    fn command_to_js(&self, command: &BrowserCommand) -> String {
        match command {
            BrowserCommand::Navigate {
                url,
                wait_for_selector,
            } => {
                let wait = wait_for_selector
                    .as_ref()
                    .map(|s| format!("\n    await page.waitForSelector({});", js_str(s)))
                    .unwrap_or_default();
                format!("    await page.goto(baseUrl + {});{}", js_str(url), wait)
            }
            BrowserCommand::Click {
                selector,
                timeout_ms,
            } => format!(
                "    await page.click({}, {{ timeout: {} }});",
                js_str(selector),
                timeout_ms.unwrap_or(5000)
            ),
            BrowserCommand::Fill {
                selector,
                value,
                clear_first,
            } => {
                let fill = format!("    await page.fill({}, {});", js_str(selector), js_str(value));
                if *clear_first {
                    format!("    await page.fill({}, '');\n{}", js_str(selector), fill)
                } else {
                    fill
                }
            }
            BrowserCommand::Type {
                selector,
                text,
                delay_ms,
            } => format!(
                "    await page.type({}, {}, {{ delay: {} }});",
                js_str(selector),
                js_str(text),
                delay_ms.unwrap_or(50)
            ),
            BrowserCommand::Press { selector, key } => match selector {
                Some(sel) => format!(
                    "    await page.locator({}).press({});",
                    js_str(sel),
                    js_str(key)
                ),
                None => format!("    await page.keyboard.press({});", js_str(key)),
            },
            BrowserCommand::Wait {
                selector,
                timeout_ms,
                state,
            } => format!(
                "    await page.waitForSelector({}, {{ state: '{}', timeout: {} }});",
                js_str(selector),
                state.as_str(),
                timeout_ms
            ),
            BrowserCommand::Sleep { ms } => format!("    await page.waitForTimeout({});", ms),
            BrowserCommand::Screenshot {
                name,
                selector,
                full_page,
            } => {
                let path = self.screenshot_dir().join(format!("{}.png", name));
                let path = js_str(&path.to_string_lossy());
                match selector {
                    Some(sel) => format!(
                        "    await page.locator({}).screenshot({{ path: {} }});",
                        js_str(sel),
                        path
                    ),
                    None => format!(
                        "    await page.screenshot({{ path: {}, fullPage: {} }});",
                        path, full_page
                    ),
                }
            }
            BrowserCommand::Hover { selector } => {
                format!("    await page.hover({});", js_str(selector))
            }
            BrowserCommand::Focus { selector } => {
                format!("    await page.focus({});", js_str(selector))
            }
            BrowserCommand::Select { selector, value } => format!(
                "    await page.selectOption({}, {});",
                js_str(selector),
                js_str(value)
            ),
            BrowserCommand::Check { selector } => {
                format!("    await page.check({});", js_str(selector))
            }
            BrowserCommand::Uncheck { selector } => {
                format!("    await page.uncheck({});", js_str(selector))
            }
            BrowserCommand::Evaluate { script } => {
                format!("    await page.evaluate(() => {{ {} }});", script)
            }
            BrowserCommand::Log { message } => {
                format!("    console.error('[TEST] ' + {});", js_str(message))
            }
        }
    }

    /// Write the script to a temp file, run it with node and return stdout
    pub async fn run_script(&self, script: &str) -> BrowserResult<String> {
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("screenplay.js");
        tokio::fs::write(&script_path, script).await?;

        tokio::fs::create_dir_all(self.screenshot_dir()).await?;

        debug!("Running Playwright script: {}", script_path.display());

        let working_dir = self
            .config
            .working_dir
            .clone()
            .unwrap_or_else(|| temp_dir.path().to_path_buf());
        let output = Command::new("node")
            .arg(&script_path)
            .current_dir(working_dir)
            .output()
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BrowserError::Playwright(format!(
                "Script failed:\nstdout: {}\nstderr: {}",
                stdout, stderr
            )));
        }

        Ok(stdout)
    }
}

#[async_trait]
impl Driver for PlaywrightDriver {
    async fn run(&self, instructions: &[Instruction]) -> BrowserResult<Vec<Value>> {
        self.check_playwright_installed().await?;

        let expected = instructions.iter().filter(|i| i.is_query()).count();
        let script = self.build_script(instructions);
        let stdout = self.run_script(&script).await?;
        parse_answers(&stdout, expected)
    }
}

/// Convert a query to JavaScript that prints its answer
fn query_to_js(query: &Query, index: usize) -> String {
    let expr = match query {
        Query::Texts { selector } => {
            format!("await page.locator({}).allTextContents()", js_str(selector))
        }
        Query::Count { selector } => format!("await page.locator({}).count()", js_str(selector)),
        Query::Attribute { selector, name } => format!(
            "(await page.locator({sel}).count()) > 0 \
             ? await page.locator({sel}).first().getAttribute({name}) : null",
            sel = js_str(selector),
            name = js_str(name)
        ),
        Query::Url => "page.url()".to_string(),
        Query::Title => "await page.title()".to_string(),
        Query::Evaluate { script } => format!("await page.evaluate(() => {{ {} }})", script),
    };
    format!(
        "    const answer_{i} = {expr};\n    console.log('__answer__[{i}] ' + JSON.stringify(answer_{i} ?? null));",
        i = index,
        expr = expr
    )
}

/// Collect `expected` answers from script output, ordered by index
pub fn parse_answers(stdout: &str, expected: usize) -> BrowserResult<Vec<Value>> {
    let mut answers: Vec<Option<Value>> = vec![None; expected];

    for line in stdout.lines() {
        let Some(caps) = ANSWER_LINE.captures(line.trim_end()) else {
            continue;
        };
        let index: usize = caps[1]
            .parse()
            .map_err(|_| BrowserError::MalformedAnswer(line.to_string()))?;
        let slot = answers
            .get_mut(index)
            .ok_or_else(|| BrowserError::MalformedAnswer(line.to_string()))?;
        if slot.is_some() {
            warn!("Duplicate answer for query {}", index);
        }
        *slot = Some(serde_json::from_str(&caps[2])?);
    }

    let actual = answers.iter().filter(|a| a.is_some()).count();
    if actual != expected {
        return Err(BrowserError::AnswerCount { expected, actual });
    }
    Ok(answers.into_iter().flatten().collect())
}

/// Quote a string as a JavaScript literal
fn js_str(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}
