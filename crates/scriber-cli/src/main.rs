//! Scriber CLI
//!
//! Compiles a recorded browser session (line-delimited JSON) into a runnable
//! Playwright test, standalone script, or bare action list.
//!
//! Usage:
//!   scriber generate session.jsonl                     # test file to stdout
//!   scriber generate session.jsonl --format script
//!   scriber generate --format body < session.jsonl
//!   scriber generate session.jsonl --output login.spec.js

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use scriber::{CompileError, OutputFormat};
use tracing::debug;

#[derive(Parser)]
#[command(name = "scriber")]
#[command(about = "Compile recorded browser sessions into Playwright source")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a recording into source text
    Generate(GenerateArgs),
}

#[derive(Parser, Debug)]
struct GenerateArgs {
    /// Recording file (stdin if absent)
    input: Option<PathBuf>,

    /// Output dialect
    #[clap(long, value_enum, default_value_t = FormatArg::Test)]
    format: FormatArg,

    /// Write the generated source to a file instead of stdout
    #[clap(long)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
#[clap(rename_all = "lower")]
enum FormatArg {
    #[default]
    Test,
    Script,
    Body,
}

impl std::fmt::Display for FormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format!("{self:?}").to_lowercase())
    }
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Test => OutputFormat::Test,
            FormatArg::Script => OutputFormat::Script,
            FormatArg::Body => OutputFormat::Body,
        }
    }
}

fn main() -> ExitCode {
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate(args) => generate(args),
    }
}

fn generate(args: GenerateArgs) -> ExitCode {
    debug!(?args.format, input = ?args.input, "compiling recording");

    let input = match read_input(args.input.as_deref()) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let source = match scriber::compile(&input, args.format.into()) {
        Ok(source) => source,
        Err(err) => {
            report(&err);
            return ExitCode::FAILURE;
        }
    };

    match write_output(args.output.as_deref(), &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read recording from {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read recording from stdin")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, source: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, source)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{source}");
            Ok(())
        }
    }
}

/// Terminate-mode diagnostics: message, offending record, remediation hint.
fn report(err: &CompileError) {
    eprintln!("---- scriber: compilation failed ----");
    eprintln!("{err}");
    if let Some(record) = err.offending_record() {
        match serde_json::to_string_pretty(record) {
            Ok(pretty) => eprintln!("offending record:\n{pretty}"),
            Err(_) => eprintln!("offending record: {record}"),
        }
    }
    eprintln!("hint: {}", err.hint());
    eprintln!("-------------------------------------");
}
