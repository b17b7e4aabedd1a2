//! retab CLI: run, validate, and explain remodeling pipelines over tabular
//! event datasets.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use retab_core::config::RunConfig;
use retab_exec::{ErrorPolicy, Executor};
use retab_io::DatasetSource;
use retab_ops::registry;
use retab_pipeline::{build, OperationSpec, Pipeline};

#[derive(Parser)]
#[command(name = "retab")]
#[command(about = "Remodel tabular event files with declarative operation pipelines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a pipeline spec over a dataset
    Run {
        /// Path to the pipeline spec (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,

        /// Dataset root directory
        #[arg(short, long)]
        data_dir: PathBuf,

        /// Filename suffix selecting the dataset's tabular files
        #[arg(long)]
        suffix: Option<String>,

        /// Directory names to skip during discovery
        #[arg(long, num_args = 1..)]
        exclude_dirs: Vec<String>,

        /// Abort the whole run on the first table failure
        #[arg(long)]
        fail_fast: bool,

        /// Where transformed tables are written (omit for a summary-only run)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Where summary reports are written
        /// (default: <data_dir>/derivatives/remodel/summaries)
        #[arg(long)]
        summary_dir: Option<PathBuf>,
    },

    /// Validate a pipeline spec without touching any data
    Validate {
        /// Path to the pipeline spec (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,
    },

    /// Show the resolved operations of a pipeline spec
    Explain {
        /// Path to the pipeline spec (JSON or YAML)
        #[arg(short, long)]
        spec: PathBuf,
    },

    /// List the registered operations and their parameters
    Ops,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            spec,
            data_dir,
            suffix,
            exclude_dirs,
            fail_fast,
            output_dir,
            summary_dir,
        } => {
            if let Err(e) = run_pipeline(
                &spec,
                &data_dir,
                suffix,
                exclude_dirs,
                fail_fast,
                output_dir,
                summary_dir,
            ) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Validate { spec } => {
            if let Err(e) = validate_pipeline(&spec) {
                eprintln!("Validation failed: {}", e);
                std::process::exit(1);
            }
            println!("✓ Pipeline spec is valid");
        }
        Commands::Explain { spec } => {
            if let Err(e) = explain_pipeline(&spec) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Ops => list_operations(),
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Decode a spec file by extension: `.yaml`/`.yml` are YAML, anything else
/// is JSON.
fn load_specs(path: &Path) -> Result<Vec<OperationSpec>, Box<dyn std::error::Error>> {
    let src = fs::read_to_string(path)?;
    let specs = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => retab_pipeline::from_yaml_str(&src)?,
        _ => retab_pipeline::from_json_str(&src)?,
    };
    Ok(specs)
}

fn build_pipeline(path: &Path) -> Result<Pipeline, Box<dyn std::error::Error>> {
    let specs = load_specs(path)?;
    Ok(build(&specs)?)
}

#[allow(clippy::too_many_arguments)]
fn run_pipeline(
    spec_path: &Path,
    data_dir: &Path,
    suffix: Option<String>,
    exclude_dirs: Vec<String>,
    fail_fast: bool,
    output_dir: Option<PathBuf>,
    summary_dir: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = build_pipeline(spec_path)?;

    let mut config = RunConfig::from_env();
    if let Some(suffix) = suffix {
        config.file_suffix = suffix;
    }
    if !exclude_dirs.is_empty() {
        config.exclude_dirs = exclude_dirs;
    }
    if fail_fast {
        config.fail_fast = true;
    }
    if let Some(dir) = output_dir {
        config.output_dir = Some(dir.display().to_string());
    }
    if let Some(dir) = summary_dir {
        config.summary_dir = Some(dir.display().to_string());
    }

    let policy = if config.fail_fast {
        ErrorPolicy::FailFast
    } else {
        ErrorPolicy::Continue
    };
    let executor = Executor::new(pipeline).with_policy(policy);

    let source = DatasetSource::new(data_dir, &config.file_suffix, &config.exclude_dirs)?;
    let mut read_errors: Vec<String> = Vec::new();
    let outcome = executor.run(source.filter_map(|item| match item {
        Ok(pair) => Some(pair),
        Err(e) => {
            tracing::warn!(error = %e, "skipping unreadable file");
            read_errors.push(e.to_string());
            None
        }
    }));

    if let Some(out_root) = &config.output_dir {
        for (id, table) in &outcome.tables {
            retab_io::write_tsv(table, &Path::new(out_root).join(id))?;
        }
    }

    let reports = executor.reports();
    if !reports.is_empty() {
        let summary_root = config.summary_dir.clone().unwrap_or_else(|| {
            data_dir
                .join("derivatives")
                .join("remodel")
                .join("summaries")
                .display()
                .to_string()
        });
        fs::create_dir_all(&summary_root)?;
        for report in reports.values() {
            let path = Path::new(&summary_root).join(&report.filename);
            fs::write(&path, serde_json::to_string_pretty(report)?)?;
            println!("  Summary '{}' → {}", report.summary_name, path.display());
        }
    }

    for failure in &outcome.failures {
        eprintln!("  Failed: {}", failure);
    }
    for error in &read_errors {
        eprintln!("  Unreadable: {}", error);
    }

    println!(
        "{} {} table(s) processed, {} failed",
        if outcome.is_success() && read_errors.is_empty() {
            "✓"
        } else {
            "✗"
        },
        outcome.tables.len(),
        outcome.failures.len()
    );
    println!(
        "  Duration: {}ms",
        outcome.manifest.finished_ms - outcome.manifest.started_ms
    );
    println!("  Spec hash: {}", outcome.manifest.spec_hash);

    if outcome.is_success() && read_errors.is_empty() {
        Ok(())
    } else if outcome.aborted {
        Err("run aborted".into())
    } else {
        Err(format!(
            "{} table(s) could not be processed",
            outcome.failures.len() + read_errors.len()
        )
        .into())
    }
}

fn validate_pipeline(spec_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let _ = build_pipeline(spec_path)?;
    Ok(())
}

fn explain_pipeline(spec_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let specs = load_specs(spec_path)?;
    let pipeline = build(&specs)?;
    println!("Pipeline ({} operations):", pipeline.len());
    for (index, spec) in specs.iter().enumerate() {
        println!(
            "  [{}] {}{}",
            index,
            spec.name,
            spec.description
                .as_deref()
                .map(|d| format!(": {}", d))
                .unwrap_or_default()
        );
        println!(
            "      {}",
            serde_json::to_string(&spec.parameters).unwrap_or_else(|_| "{}".to_string())
        );
    }
    println!("Spec hash: {}", pipeline.spec_hash());
    Ok(())
}

fn list_operations() {
    println!("Registered operations:");
    for kind in registry::OperationKind::ALL {
        let schema = kind.schema();
        let describe = |required: bool| {
            schema
                .fields
                .iter()
                .filter(|f| f.required == required)
                .map(|f| f.key)
                .collect::<Vec<_>>()
                .join(", ")
        };
        println!("  {}", kind.name());
        let required = describe(true);
        if !required.is_empty() {
            println!("      required: {}", required);
        }
        let optional = describe(false);
        if !optional.is_empty() {
            println!("      optional: {}", optional);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specs_decode_from_json_and_yaml() {
        let json = r#"[{"name": "remove_rows",
                        "parameters": {"column_name": "trial_type",
                                       "remove_values": ["n/a"]}}]"#;
        let specs = retab_pipeline::from_json_str(json).expect("json spec should decode");
        assert_eq!(specs.len(), 1);
        assert!(build(&specs).is_ok());

        let yaml = "- name: remove_rows\n  parameters:\n    column_name: trial_type\n    remove_values: [stop]\n";
        let specs = retab_pipeline::from_yaml_str(yaml).expect("yaml spec should decode");
        assert_eq!(specs.len(), 1);
        assert!(build(&specs).is_ok());
    }

    #[test]
    fn every_registered_operation_has_a_schema() {
        for kind in registry::OperationKind::ALL {
            assert_eq!(kind.schema().operation, kind.name());
        }
    }
}
