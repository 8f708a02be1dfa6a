use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use nested_form_core::{DocumentVariant, VariantRegistry, augmented};
use nested_form_decode::{DecodeOptions, decode_form};

/// CLI output format with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "form-decode")]
#[command(about = "Decode bracket-path form submissions into nested JSON")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a urlencoded form body into a nested tree.
    Decode(DecodeArgs),
    /// Inject discriminator properties into variant schema documents.
    Augment(AugmentArgs),
    /// Resolve which registered variant a decoded tree represents.
    Resolve(ResolveArgs),
}

#[derive(Debug, Args)]
struct DecodeArgs {
    /// File containing the form body (defaults to stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// Root prefix the form widget uses for nested field names.
    #[arg(long, default_value = "root")]
    root: String,
    /// Treat the input as `key=value` lines instead of a urlencoded body.
    /// Values starting with `[` or `{` are parsed as JSON (pre-populated
    /// defaults).
    #[arg(long)]
    lines: bool,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct AugmentArgs {
    /// Variant schema JSON files (tag taken from each document's title).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Reserved discriminator key to inject.
    #[arg(long, default_value = "_type")]
    discriminator: String,
    /// Output directory for augmented documents (defaults to stdout).
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Variant schema JSON files to register.
    #[arg(long, required = true)]
    schemas: Vec<PathBuf>,
    /// File containing the decoded JSON tree (defaults to stdin).
    #[arg(long)]
    input: Option<PathBuf>,
    /// JSON pointer to the polymorphic sub-tree within the input.
    #[arg(long)]
    pointer: Option<String>,
    /// Reserved discriminator key to read.
    #[arg(long, default_value = "_type")]
    discriminator: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Decode(args) => run_decode(args),
        Command::Augment(args) => run_augment(args),
        Command::Resolve(args) => run_resolve(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_decode(args: DecodeArgs) -> Result<(), String> {
    let body = read_input(args.input.as_deref())?;
    let fields = if args.lines {
        parse_line_pairs(&body)?
    } else {
        parse_urlencoded_pairs(&body)?
    };

    let options = DecodeOptions::with_root(&args.root);
    let tree = decode_form(fields, &options).map_err(|err| err.to_string())?;
    print_value(&tree, args.format)
}

fn run_augment(args: AugmentArgs) -> Result<(), String> {
    if let Some(dir) = &args.output {
        fs::create_dir_all(dir).map_err(|err| {
            format!("Failed to create output directory '{}': {err}", dir.display())
        })?;
    }

    for input in &args.inputs {
        let document = read_json_file(input)?;
        let tag = document
            .get("title")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                format!(
                    "'{}' has no title to use as its variant tag",
                    input.display()
                )
            })?
            .to_string();
        let augmented_document = augmented(&document, &args.discriminator, &tag)
            .map_err(|err| format!("'{}': {err}", input.display()))?;
        let raw = serde_json::to_string_pretty(&augmented_document)
            .map_err(|err| format!("Failed to serialize augmented schema: {err}"))?;

        match &args.output {
            Some(dir) => {
                let path = dir.join(format!("{tag}.json"));
                fs::write(&path, raw)
                    .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
            }
            None => println!("{raw}"),
        }
    }

    if let Some(dir) = &args.output {
        println!(
            "Augmented {} schema file(s) into '{}'.",
            args.inputs.len(),
            dir.display()
        );
    }
    Ok(())
}

fn run_resolve(args: ResolveArgs) -> Result<(), String> {
    let mut registry = VariantRegistry::with_discriminator(&args.discriminator);
    for path in &args.schemas {
        let document = read_json_file(path)?;
        let variant = DocumentVariant::from_document(document)
            .map_err(|err| format!("'{}': {err}", path.display()))?;
        registry
            .register(Arc::new(variant))
            .map_err(|err| err.to_string())?;
    }

    let raw = read_input(args.input.as_deref())?;
    let tree: Value =
        serde_json::from_str(&raw).map_err(|err| format!("Invalid JSON input: {err}"))?;
    let sub_tree = match &args.pointer {
        Some(pointer) => tree
            .pointer(pointer)
            .ok_or_else(|| format!("No value at JSON pointer '{pointer}'"))?,
        None => &tree,
    };

    let variant = registry
        .validate_tree(sub_tree)
        .map_err(|err| err.to_string())?;
    println!(
        "Resolved variant '{}' ({} declared field(s)).",
        variant.tag(),
        variant.field_names().len()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_input(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .map_err(|err| format!("Failed to read stdin: {err}"))?;
            Ok(raw)
        }
    }
}

fn read_json_file(path: &Path) -> Result<Value, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    serde_json::from_str(&raw).map_err(|err| format!("Invalid JSON in '{}': {err}", path.display()))
}

/// Parses an `application/x-www-form-urlencoded` body into field pairs.
fn parse_urlencoded_pairs(body: &str) -> Result<Vec<(String, Value)>, String> {
    body.trim()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((
                decode_component(key)?,
                Value::String(decode_component(value)?),
            ))
        })
        .collect()
}

fn decode_component(raw: &str) -> Result<String, String> {
    urlencoding::decode(&raw.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|err| format!("Invalid percent-encoding in '{raw}': {err}"))
}

/// Parses `key=value` lines; values starting with `[` or `{` are taken as
/// JSON so pre-populated defaults can be expressed.
fn parse_line_pairs(body: &str) -> Result<Vec<(String, Value)>, String> {
    let mut fields = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| format!("Expected 'key=value', got '{line}'"))?;
        let value = if value.starts_with('[') || value.starts_with('{') {
            serde_json::from_str(value)
                .map_err(|err| format!("Invalid JSON value in '{line}': {err}"))?
        } else {
            Value::String(value.to_string())
        };
        fields.push((key.to_string(), value));
    }
    Ok(fields)
}

fn print_value(value: &Value, format: CliOutputFormat) -> Result<(), String> {
    match format {
        CliOutputFormat::Json => {
            let raw = serde_json::to_string_pretty(value)
                .map_err(|err| format!("JSON serialization failed: {err}"))?;
            println!("{raw}");
        }
        CliOutputFormat::Yaml => {
            let raw = serde_yaml::to_string(value)
                .map_err(|err| format!("YAML serialization failed: {err}"))?;
            print!("{raw}");
        }
    }
    Ok(())
}
