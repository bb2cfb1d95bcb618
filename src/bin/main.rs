//! Heron CLI - Generate a KPI catalog from a CSV file
//!
//! Usage:
//!   heron generate <file.csv> [--config <heron.toml>] [--table <name>] [--output <format>]
//!   heron profile <file.csv>
//!
//! Examples:
//!   heron generate orders.csv --table orders
//!   heron generate orders.csv --output sql
//!   heron profile orders.csv

use clap::{Parser, Subcommand, ValueEnum};
use heron::config::PipelineConfig;
use heron::dataset::{Column, Dataset, Value};
use heron::pipeline;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "heron")]
#[command(about = "Heron - generate a ranked KPI catalog from tabular data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the full KPI catalog from a CSV file
    Generate {
        /// Path to the CSV file
        file: PathBuf,

        /// Path to a TOML config file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Table name used in the generated SQL
        #[arg(short, long)]
        table: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        output: OutputFormat,
    },

    /// Print column profiles and the quality report without KPIs
    Profile {
        /// Path to the CSV file
        file: PathBuf,

        /// Path to a TOML config file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Full catalog as JSON
    Json,
    /// SQL statements only, one per KPI
    Sql,
    /// Human-readable ranked summary
    Summary,
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            file,
            config,
            table,
            output,
        } => cmd_generate(file, config, table, output),
        Commands::Profile { file, config } => cmd_profile(file, config),
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>, table: Option<String>) -> Result<PipelineConfig, String> {
    let mut config = match path {
        Some(p) => PipelineConfig::from_file(p).map_err(|e| e.to_string())?,
        None => PipelineConfig::default(),
    };
    if let Some(table) = table {
        config.table_name = table;
    }
    Ok(config)
}

fn cmd_generate(
    file: PathBuf,
    config_path: Option<PathBuf>,
    table: Option<String>,
    output: OutputFormat,
) -> ExitCode {
    let config = match load_config(config_path.as_deref(), table) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let dataset = match load_csv(&file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", file.display());
            return ExitCode::FAILURE;
        }
    };

    let catalog = pipeline::run(&dataset, &config);

    match output {
        OutputFormat::Json => match serde_json::to_string_pretty(&catalog) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing catalog: {e}");
                return ExitCode::FAILURE;
            }
        },
        OutputFormat::Sql => {
            for entry in &catalog.entries {
                println!("-- {} [{}]", entry.kpi.title, entry.kpi.id);
                println!("{}", entry.sql_text);
                println!();
            }
        }
        OutputFormat::Summary => {
            println!(
                "{} rows, {} columns, quality {:.2}",
                catalog.row_count,
                catalog.profiles.len(),
                catalog.quality.overall
            );
            for (i, entry) in catalog.entries.iter().enumerate() {
                println!(
                    "{:3}. [{:.2}] {} ({})",
                    i + 1,
                    entry.kpi.confidence,
                    entry.kpi.title,
                    entry.kpi.category.as_str()
                );
                if let Some(insight) = &entry.kpi.insight {
                    println!("       {insight}");
                }
            }
        }
    }
    ExitCode::SUCCESS
}

fn cmd_profile(file: PathBuf, config_path: Option<PathBuf>) -> ExitCode {
    let config = match load_config(config_path.as_deref(), None) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };
    let dataset = match load_csv(&file) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading '{}': {e}", file.display());
            return ExitCode::FAILURE;
        }
    };

    let profiles = heron::schema::infer(&dataset, &config);
    let analysis = heron::stats::analyze(&dataset, &profiles, &config);
    let quality = heron::quality::assess(&dataset, &analysis.profiles, &config);

    for profile in &analysis.profiles {
        println!(
            "{:<24} {:<12} distinct={:<6} missing={:.1}%",
            profile.name,
            profile.role.as_str(),
            profile.cardinality,
            profile.missing_ratio * 100.0
        );
    }
    println!();
    println!(
        "quality: overall={:.2} completeness={:.2} uniqueness={:.2} consistency={:.2} validity={:.2} accuracy={:.2}",
        quality.overall,
        quality.completeness,
        quality.uniqueness,
        quality.consistency,
        quality.validity,
        quality.accuracy
    );
    for issue in &quality.issues {
        println!("issue: {issue}");
    }
    ExitCode::SUCCESS
}

/// Load a CSV file into columns. Each cell parses as an integer first,
/// then a float, then falls back to text; empty cells are null.
fn load_csv(path: &Path) -> Result<Dataset, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(|e| e.to_string())?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(str::to_string)
        .collect();

    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record.map_err(|e| e.to_string())?;
        for (i, cell) in record.iter().enumerate() {
            if i < columns.len() {
                columns[i].push(parse_cell(cell));
            }
        }
    }

    let columns = headers
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Dataset::new(columns).map_err(|e| e.to_string())
}

fn parse_cell(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Value::Int(n);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return Value::Float(f);
        }
    }
    Value::Text(trimmed.to_string())
}
