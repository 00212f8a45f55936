use clap::{Parser, Subcommand};
use hello_uart_config::{RunConfig, TestAssertion, TestScript};
use hello_uart_core::{BusyWait, Harness, UartId};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

mod host_uart;

use host_uart::HostUart;

const EXIT_PASS: u8 = 0;
const EXIT_ASSERT_FAIL: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;
const EXIT_RUNTIME_ERROR: u8 = 3;

const RESULT_SCHEMA_VERSION: &str = "1.0";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Hello UART host runner",
    long_about = "Runs the UART bring-up loop on the host: a four digit counter \
                  followed by 'Hello world!' on every line, written to stdout.",
    subcommand_negates_reqs = true
)]
struct Cli {
    /// Path to a run configuration (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// UART to drive (uart0..uart3); overrides the config file
    #[arg(short, long)]
    uart: Option<UartId>,

    /// Stop after this many lines (default: run forever)
    #[arg(short, long)]
    lines: Option<u64>,

    /// Busy-wait iterations between lines; a loop count, not a duration
    #[arg(long)]
    delay: Option<u32>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Deterministic, CI-friendly mode driven by a test script (YAML).
    Test(TestArgs),
}

#[derive(Parser, Debug)]
struct TestArgs {
    /// Path to the test script (YAML)
    #[arg(short = 'c', long)]
    script: PathBuf,

    /// Disable UART stdout echo (still captured for assertions/artifacts)
    #[arg(long)]
    no_uart_stdout: bool,

    /// Directory to write test artifacts (result.json, uart.log)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct TestResult {
    result_schema_version: String,
    status: String,
    uart: UartId,
    base_address: String,
    delay_iterations: u32,
    lines: u64,
    bytes: u64,
    assertions: Vec<AssertionResult>,
    transcript_sha256: String,
    script: String,
}

#[derive(Debug, Serialize)]
struct AssertionResult {
    assertion: TestAssertion,
    passed: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout carries the UART stream, so logs go to stderr.
    if cli.trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Some(Commands::Test(ref args)) => run_test(args),
        None => run_interactive(&cli),
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<RunConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading run config: {:?}", path);
            RunConfig::from_file(path)?
        }
        None => RunConfig::default(),
    };

    if let Some(uart) = cli.uart {
        config.uart = uart;
    }
    if let Some(lines) = cli.lines {
        config.lines = Some(lines);
    }
    if let Some(delay) = cli.delay {
        config.delay_iterations = delay;
    }

    config.validate()?;
    Ok(config)
}

fn log_init(uart: UartId) {
    info!("Initializing {} at {:#010x}", uart, uart.base_address());
}

fn run_interactive(cli: &Cli) -> ExitCode {
    let config = match resolve_config(cli) {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    match config.lines {
        Some(n) => info!("Running {} lines", n),
        None => info!("Running until interrupted"),
    }
    info!("Delay: {} busy-wait iterations per line", config.delay_iterations);

    let stdout = std::io::stdout();
    let mut harness = Harness::boot(
        config.uart,
        log_init,
        HostUart::new(stdout.lock()),
        BusyWait::new(config.delay_iterations),
    );

    let mut emitted: u64 = 0;
    while config.lines.map_or(true, |limit| emitted < limit) {
        harness.emit_line();
        emitted += 1;
        if let Err(e) = harness.sink_mut().end_line() {
            error!("UART stream closed after {} lines: {}", emitted, e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    }

    info!(
        "Done: {} lines, {} bytes",
        emitted,
        harness.sink().bytes_written()
    );
    ExitCode::from(EXIT_PASS)
}

fn run_test(args: &TestArgs) -> ExitCode {
    let script = match TestScript::from_file(&args.script) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to load test script: {:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let run = &script.run;
    let lines = script.limits.max_lines;
    info!("Test script: {:?}", args.script);
    info!("Running {} lines on {}", lines, run.uart);

    let mut harness = Harness::boot(
        run.uart,
        log_init,
        Vec::with_capacity(lines as usize * 18),
        BusyWait::new(run.delay_iterations),
    );
    harness.run_for(lines);
    let transcript = harness.into_sink();

    if !args.no_uart_stdout {
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = stdout.write_all(&transcript).and_then(|_| stdout.flush()) {
            error!("Failed to echo UART output: {}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
    }

    let assertions: Vec<AssertionResult> = script
        .assertions
        .iter()
        .map(|a| AssertionResult {
            assertion: a.clone(),
            passed: a.check(&transcript),
        })
        .collect();

    for result in assertions.iter().filter(|r| !r.passed) {
        error!("Assertion failed: {:?}", result.assertion);
    }
    let passed = assertions.iter().all(|r| r.passed);

    let result = TestResult {
        result_schema_version: RESULT_SCHEMA_VERSION.to_string(),
        status: if passed { "pass" } else { "fail" }.to_string(),
        uart: run.uart,
        base_address: format!("{:#010x}", run.uart.base_address()),
        delay_iterations: run.delay_iterations,
        lines,
        bytes: transcript.len() as u64,
        assertions,
        transcript_sha256: sha256_hex(&transcript),
        script: args.script.display().to_string(),
    };

    if let Some(dir) = &args.output_dir {
        if let Err(e) = write_artifacts(dir, &result, &transcript) {
            error!("Failed to write artifacts: {:#}", e);
            return ExitCode::from(EXIT_RUNTIME_ERROR);
        }
        info!("Artifacts written to {:?}", dir);
    }

    if passed {
        info!("PASS ({} assertions)", result.assertions.len());
        ExitCode::from(EXIT_PASS)
    } else {
        error!("FAIL");
        ExitCode::from(EXIT_ASSERT_FAIL)
    }
}

fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

fn write_artifacts(dir: &Path, result: &TestResult, transcript: &[u8]) -> anyhow::Result<()> {
    use anyhow::Context;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output dir {:?}", dir))?;

    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(dir.join("result.json"), json).context("Failed to write result.json")?;
    std::fs::write(dir.join("uart.log"), transcript).context("Failed to write uart.log")?;
    Ok(())
}
