mod atomic;
mod logging;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use seedfill_core::{
    Error as CoreError, TYPE_SCHEMA_VERSION, TypeRef, TypeSchema, type_schema_json_schema,
};
use seedfill_populate::{PopulateError, PopulateOptions, Populator};
use thiserror::Error;
use uuid::Uuid;

use atomic::write_bytes_atomic;
use logging::{init_file_logging, init_stderr_logging};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("population error: {0}")]
    Populate(#[from] PopulateError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "seedfill", version, about = "Deterministic object-graph population")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Populate a type described in a type file and print it as JSON.
    Populate(PopulateArgs),
    /// Parse and validate a type file.
    Check(CheckArgs),
    /// Print the JSON Schema of type files.
    Schema,
}

#[derive(Args, Debug)]
struct PopulateArgs {
    /// Type file (JSON) describing enums and objects.
    #[arg(long, value_name = "FILE")]
    types: PathBuf,
    /// Type to populate, e.g. `DemoPojo` or `List<DemoPojo>`.
    #[arg(long = "type", value_name = "TYPE")]
    target: TypeRef,
    /// Seed driving every random decision.
    #[arg(long, allow_negative_numbers = true)]
    seed: i64,
    /// Options file (TOML).
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,
    /// Write the result here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Append JSON logs to this file instead of logging to stderr.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Type file (JSON) to validate.
    #[arg(long, value_name = "FILE")]
    types: PathBuf,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Populate(args) => run_populate(args),
        Command::Check(args) => run_check(args),
        Command::Schema => run_schema(),
    }
}

fn run_populate(args: PopulateArgs) -> Result<(), CliError> {
    let PopulateArgs {
        types,
        target,
        seed,
        options,
        out,
        log_file,
    } = args;

    match &log_file {
        Some(path) => init_file_logging(path)?,
        None => init_stderr_logging()?,
    }

    let run_id = Uuid::new_v4().to_string();
    let timer = Instant::now();
    tracing::info!(event = "run_started", run_id = %run_id, target = %target, seed);

    let registry = load_type_schema(&types)?.into_registry()?;
    let options = match &options {
        Some(path) => PopulateOptions::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => PopulateOptions::default(),
    };

    let value = Populator::with_options(registry, options)?.populate(&target, seed, &[])?;
    let mut rendered = serde_json::to_vec_pretty(&value)?;
    rendered.push(b'\n');

    match &out {
        Some(path) => {
            write_bytes_atomic(path, &rendered)?;
            tracing::info!(event = "output_written", path = %path.display());
        }
        None => print!("{}", String::from_utf8_lossy(&rendered)),
    }

    tracing::info!(
        event = "run_finished",
        run_id = %run_id,
        status = "success",
        duration_ms = timer.elapsed().as_millis() as u64
    );
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<(), CliError> {
    init_stderr_logging()?;
    let schema = load_type_schema(&args.types)?;
    if schema.schema_version != TYPE_SCHEMA_VERSION {
        tracing::warn!(
            found = %schema.schema_version,
            expected = TYPE_SCHEMA_VERSION,
            "type file version differs"
        );
    }
    let registry = schema.into_registry()?;
    println!("ok: {} type(s)", registry.len());
    for name in registry.names() {
        println!("  {name}");
    }
    Ok(())
}

fn run_schema() -> Result<(), CliError> {
    let schema = type_schema_json_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn load_type_schema(path: &Path) -> Result<TypeSchema, CliError> {
    let contents = std::fs::read_to_string(path).map_err(|err| {
        CliError::InvalidConfig(format!("cannot read type file '{}': {err}", path.display()))
    })?;
    Ok(serde_json::from_str(&contents)?)
}
