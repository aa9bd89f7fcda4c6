use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use log::debug;

use carina_core::resource::Value;
use carina_provider_pipes::config::{ConfigBlock, SourceParametersConfig};
use carina_provider_pipes::model::PipeSourceParameters;
use carina_provider_pipes::schemas::pipe_schema;
use carina_provider_pipes::utils::{parse_attributes, value_to_json};
use carina_provider_pipes::{
    ValidationError, expand_source_parameters, expand_update_source_parameters,
    flatten_source_parameters_node, validate_pipe,
};

#[derive(Parser)]
#[command(name = "carina-pipes")]
#[command(about = "Validate and convert pipe source parameters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a pipe configuration document
    Validate {
        /// Path to the JSON configuration
        file: PathBuf,
    },
    /// Convert `source_parameters` of a configuration into API parameters
    Expand {
        /// Path to the JSON configuration
        file: PathBuf,

        /// Produce the update request shape (omits fields that replace the pipe)
        #[arg(long)]
        update: bool,
    },
    /// Convert API source parameters back into configuration
    Flatten {
        /// Path to a JSON `PipeSourceParameters` object
        file: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { file } => run_validate(&file),
        Commands::Expand { file, update } => run_expand(&file, update),
        Commands::Flatten { file } => run_flatten(&file),
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_file(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

fn load_pipe(file: &Path) -> Result<HashMap<String, Value>> {
    let content = read_file(file)?;
    parse_attributes(&content).with_context(|| format!("Failed to parse {}", file.display()))
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

fn check_pipe(attributes: &HashMap<String, Value>) -> Result<()> {
    if let Err(errors) = validate_pipe(attributes) {
        bail!(
            "{} validation error(s):\n{}",
            errors.len(),
            format_errors(&errors)
        );
    }
    Ok(())
}

fn run_validate(file: &Path) -> Result<()> {
    let attributes = load_pipe(file)?;

    println!("{}", "Validating...".cyan());
    check_pipe(&attributes)?;

    println!("{}", "✓ Pipe configuration is valid.".green().bold());
    Ok(())
}

/// Validate, apply schema defaults and expand `source_parameters`
fn expand_pipe(mut attributes: HashMap<String, Value>, update: bool) -> Result<serde_json::Value> {
    check_pipe(&attributes)?;
    pipe_schema().apply_defaults(&mut attributes);

    let Some(node) = attributes.get("source_parameters").and_then(Value::as_block) else {
        debug!("no source_parameters configured");
        return Ok(serde_json::Value::Null);
    };
    let config = SourceParametersConfig::from_value(node);

    let json = if update {
        serde_json::to_value(expand_update_source_parameters(&config))?
    } else {
        serde_json::to_value(expand_source_parameters(&config))?
    };
    Ok(json)
}

fn run_expand(file: &Path, update: bool) -> Result<()> {
    let attributes = load_pipe(file)?;
    let json = expand_pipe(attributes, update)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Flatten API source parameters into a `{"source_parameters": ...}` document
fn flatten_pipe(content: &str) -> Result<serde_json::Value> {
    let api: PipeSourceParameters =
        serde_json::from_str(content).context("Failed to parse PipeSourceParameters")?;

    let mut document = serde_json::Map::new();
    if let Some(node) = flatten_source_parameters_node(Some(&api)) {
        document.insert("source_parameters".to_string(), value_to_json(&node));
    }
    Ok(serde_json::Value::Object(document))
}

fn run_flatten(file: &Path) -> Result<()> {
    let content = read_file(file)?;
    let json = flatten_pipe(&content)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
