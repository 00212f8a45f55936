use anyhow::{Context, Result};
use hello_uart_core::{UartId, DEFAULT_DELAY_ITERATIONS};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SCHEMA_VERSION: &str = "1.0";

/// Upper bound on `limits.max_lines`; a full counter cycle is 10000 lines.
pub const MAX_ALLOWED_LINES: u64 = 1_000_000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unsupported schema_version '{0}'. Supported versions: '1.0'")]
    UnsupportedSchema(String),
    #[error("'lines' must be greater than zero (omit it to run forever)")]
    ZeroLines,
    #[error("Limit 'max_lines' must be greater than zero")]
    ZeroMaxLines,
    #[error("Limit 'max_lines' ({requested}) exceeds the maximum of {max}")]
    MaxLinesTooLarge { requested: u64, max: u64 },
    #[error("'run.lines' is not allowed in a test script; use 'limits.max_lines'")]
    LinesInScript,
    #[error("Assertion '{0}' needs a non-empty value")]
    EmptyAssertion(&'static str),
}

fn default_delay_iterations() -> u32 {
    DEFAULT_DELAY_ITERATIONS
}

/// What to drive and for how long.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default)]
    pub uart: UartId,
    /// Busy-wait loop count between lines. Not a time unit.
    #[serde(default = "default_delay_iterations")]
    pub delay_iterations: u32,
    /// Number of lines to print; `None` runs forever.
    #[serde(default)]
    pub lines: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            uart: UartId::default(),
            delay_iterations: DEFAULT_DELAY_ITERATIONS,
            lines: None,
        }
    }
}

impl RunConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open run config at {:?}", path.as_ref()))?;
        let config: Self =
            serde_yaml::from_reader(f).context("Failed to parse Run Config YAML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lines == Some(0) {
            return Err(ConfigError::ZeroLines);
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TestLimits {
    pub max_lines: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputContainsAssertion {
    pub output_contains: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LineCountAssertion {
    pub line_count: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LastLineAssertion {
    pub last_line: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum TestAssertion {
    OutputContains(OutputContainsAssertion),
    LineCount(LineCountAssertion),
    LastLine(LastLineAssertion),
}

impl TestAssertion {
    /// Checks the assertion against a captured transcript.
    pub fn check(&self, output: &[u8]) -> bool {
        match self {
            TestAssertion::OutputContains(a) => {
                let needle = a.output_contains.as_bytes();
                needle.is_empty() || output.windows(needle.len()).any(|w| w == needle)
            }
            TestAssertion::LineCount(a) => lines(output).count() as u64 == a.line_count,
            TestAssertion::LastLine(a) => {
                lines(output).last() == Some(a.last_line.as_bytes())
            }
        }
    }
}

/// Splits a transcript on `\r\n`, dropping the empty tail after the final
/// terminator.
fn lines(output: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = output;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.windows(2).position(|w| w == b"\r\n") {
            Some(pos) => {
                let line = &rest[..pos];
                rest = &rest[pos + 2..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = &[];
                Some(line)
            }
        }
    })
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TestScript {
    pub schema_version: String,
    #[serde(default)]
    pub run: RunConfig,
    pub limits: TestLimits,
    #[serde(default)]
    pub assertions: Vec<TestAssertion>,
}

impl TestScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open test script at {:?}", path.as_ref()))?;
        let script: Self =
            serde_yaml::from_reader(f).context("Failed to parse Test Script YAML")?;
        script.validate()?;
        Ok(script)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(ConfigError::UnsupportedSchema(self.schema_version.clone()));
        }

        if self.run.lines.is_some() {
            return Err(ConfigError::LinesInScript);
        }

        if self.limits.max_lines == 0 {
            return Err(ConfigError::ZeroMaxLines);
        }

        if self.limits.max_lines > MAX_ALLOWED_LINES {
            return Err(ConfigError::MaxLinesTooLarge {
                requested: self.limits.max_lines,
                max: MAX_ALLOWED_LINES,
            });
        }

        for assertion in &self.assertions {
            if let TestAssertion::OutputContains(a) = assertion {
                if a.output_contains.is_empty() {
                    return Err(ConfigError::EmptyAssertion("output_contains"));
                }
            }
        }

        Ok(())
    }
}
