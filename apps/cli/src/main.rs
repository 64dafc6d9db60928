//! `fshval` - validate the resources generated by a SUSHI project.
//!
//! Usage:
//!   fshval [-p <project-dir>] [-g <generated-dir>] [-c <package-cache>] [-i <id>]... [-v]... [FILES]...

mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use fshval_context::{json_files, ErrorKind, ProjectConfig, ProjectResources, GENERATED_DIR};
use fshval_validator::{CanonicalLookupEngine, IgnoreList, ValidationReport, DEFAULT_IGNORED_IDS};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::info;

/// Exit status when validation reported at least one error.
const EXIT_VALIDATION_ERRORS: u8 = 1;
/// Exit status for a failure outside the project loading taxonomy, such as an
/// unusable project directory.
const EXIT_SETUP_FAILURE: u8 = 7;

#[derive(Debug, Error)]
enum CliError {
    #[error("SUSHI project directory does not exist: {}", .0.display())]
    ProjectDirMissing(PathBuf),

    #[error("Cannot resolve SUSHI project directory {}: {source}", path.display())]
    ProjectDirUnresolvable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Parser, Debug)]
#[command(name = "fshval", version)]
#[command(about = "Validates the generated resources in a SUSHI project")]
struct Args {
    /// SUSHI project directory
    #[arg(short = 'p', long, default_value = ".")]
    project_dir: PathBuf,

    /// Path to generated resources (default: <project-dir>/fsh-generated)
    #[arg(short = 'g', long)]
    generated_dir: Option<PathBuf>,

    /// FHIR package cache (default: ~/.fhir/packages)
    #[arg(short = 'c', long, env = "FHIR_PACKAGE_CACHE")]
    package_cache: Option<PathBuf>,

    /// Message ids to ignore
    #[arg(short = 'i', long = "ignore-ids", default_values_t = DEFAULT_IGNORED_IDS.map(String::from))]
    ignore_ids: Vec<String>,

    /// Increase verbosity, e.g. `-v`, `-vv` or `-vvv`
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Specific files to validate (default: every JSON file under <generated-dir>/resources)
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_status_for(&err))
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    if !args.project_dir.is_dir() {
        return Err(CliError::ProjectDirMissing(args.project_dir.clone()).into());
    }
    let project_dir = args
        .project_dir
        .canonicalize()
        .map_err(|source| CliError::ProjectDirUnresolvable {
            path: args.project_dir.clone(),
            source,
        })?;

    let mut config = ProjectConfig::new(&project_dir);
    if let Some(generated_dir) = &args.generated_dir {
        config = config.with_generated_dir(generated_dir);
    }
    if let Some(package_cache) = &args.package_cache {
        config = config.with_package_cache_dir(package_cache);
    }
    info!(
        project = %config.project_dir.display(),
        generated = %config.generated_dir.display(),
        cache = %config.package_cache_dir.display(),
        "Configuration"
    );

    let project = ProjectResources::load(&config).context("Failed to load project resources")?;
    let engine = CanonicalLookupEngine::from_store(project.store());

    let files = if args.files.is_empty() {
        json_files(&config.generated_dir.join("resources"))
            .with_context(|| format!("No resources found in {GENERATED_DIR} output"))?
    } else {
        args.files.clone()
    };

    let ignore = IgnoreList::new(args.ignore_ids.iter().cloned());
    let report = ValidationReport::run(&engine, &files, &ignore);
    for result in &report.results {
        for line in result.lines() {
            println!("{line}");
        }
    }
    println!("{}", report.summary);

    Ok(if report.summary.has_errors() {
        ExitCode::from(EXIT_VALIDATION_ERRORS)
    } else {
        ExitCode::SUCCESS
    })
}

/// Process exit status for a failed run, distinct per failure kind and never
/// equal to [`EXIT_VALIDATION_ERRORS`].
fn exit_status_for(err: &anyhow::Error) -> u8 {
    let Some(err) = err.downcast_ref::<fshval_context::Error>() else {
        return EXIT_SETUP_FAILURE;
    };

    match err.kind() {
        ErrorKind::ManifestNotFound => 2,
        ErrorKind::ManifestParse => 3,
        ErrorKind::PackageNotInstalled => 4,
        ErrorKind::PackageCorrupt => 5,
        ErrorKind::GeneratedResources => 6,
    }
}
