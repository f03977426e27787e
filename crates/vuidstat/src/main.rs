//! vuidstat - Measure valid usage identifier coverage of a validation layer
//!
//! vuidstat reads the registry of valid usage identifiers (`validusage.json`),
//! scans the layer sources for the identifiers they check and the layer tests
//! for the identifiers they exercise, and reports coverage and consistency.

mod config;
mod output;

use config::{Config, DEFAULT_CONFIG_PATH};
use eyre::{Result, WrapErr};
use figue as args;
use output::{
    DatabaseFormat, render_consistency, render_database, render_status, render_summary,
    render_unimplemented,
};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vuidstat_core::{Analysis, ImplementationIndex, PathSources, Registry, TestIndex};

/// CLI arguments
#[derive(Debug, facet::Facet)]
struct Args {
    /// Path to the registry file (validusage.json)
    #[facet(args::positional)]
    registry: PathBuf,

    /// Path to config file (default: .config/vuidstat/config.json under --root)
    #[facet(args::named, args::short = 'c', default)]
    config: Option<PathBuf>,

    /// Root of the layer source tree (default: current directory)
    #[facet(args::named, args::short = 'r', default)]
    root: Option<PathBuf>,

    /// Run the consistency checks (exit 1 if any fails)
    #[facet(args::named, default)]
    consistency: bool,

    /// Report the status of a single identifier
    #[facet(args::named, default)]
    vuid: Option<String>,

    /// Report explicit identifiers that no layer code checks
    #[facet(args::named, default)]
    todo: bool,

    /// Export the database as `~^~`-delimited text
    #[facet(args::named, default)]
    text: Option<PathBuf>,

    /// Export the database as CSV
    #[facet(args::named, default)]
    csv: Option<PathBuf>,

    /// Export the database as an HTML table
    #[facet(args::named, default)]
    html: Option<PathBuf>,

    /// Compare deprecated identifier spellings as written
    #[facet(args::named, default)]
    keep_aliases: bool,

    /// Include provisional (UNASSIGNED-) identifiers in reports
    #[facet(args::named, default)]
    report_unassigned: bool,

    /// Show verbose output including per-universe counts
    #[facet(args::named, args::short = 'v', default)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args: Args = figue::from_std_args().wrap_err("Failed to parse command line arguments")?;

    init_tracing(args.verbose);

    if run(args)? {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "vuidstat=debug,vuidstat_core=debug"
    } else {
        "vuidstat=warn,vuidstat_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Run one analysis. Returns `false` when requested consistency checks fail.
fn run(args: Args) -> Result<bool> {
    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir().wrap_err("Failed to get current directory")?,
    };

    let (config_path, required) = match args.config {
        Some(path) => (path, true),
        None => (root.join(DEFAULT_CONFIG_PATH), false),
    };
    let config = Config::load(&config_path, required)?;
    let policy = config.policy(args.keep_aliases, args.report_unassigned);
    info!(?policy, "resolved consistency policy");

    eprintln!(
        "{} Loading registry from {}...",
        "->".blue().bold(),
        args.registry.display()
    );
    let registry = Registry::load(&args.registry)?;
    eprintln!(
        "   Found {} identifiers (API version {})",
        registry.len().to_string().green(),
        registry.api_version()
    );

    eprintln!("{} Scanning layer sources...", "->".blue().bold());
    let generated = config.generated_sources();
    let dirs = config.generated_dirs();
    let sources = PathSources::new(config.layer_sources(&root)).with_generated(
        &root,
        generated.as_slice(),
        dirs.as_slice(),
    )?;
    let implementation = ImplementationIndex::build(sources)
        .wrap_err_with(|| format!("Failed to scan layer sources under {}", root.display()))?;
    eprintln!(
        "   Found {} distinct identifiers",
        implementation.len().to_string().green()
    );

    eprintln!("{} Scanning layer tests...", "->".blue().bold());
    let tests = TestIndex::build(
        PathSources::new(config.test_sources(&root)),
        &config.test_triggers(),
    )
    .wrap_err_with(|| format!("Failed to scan layer tests under {}", root.display()))?;
    eprintln!(
        "   Found {} distinct identifiers",
        tests.len().to_string().green()
    );

    let analysis = Analysis::new(registry, implementation, tests, policy);

    print!("{}", render_summary(&analysis, args.verbose));

    if let Some(id) = &args.vuid {
        print!("{}", render_status(id, analysis.status(id)));
    }

    if args.todo {
        print!("{}", render_unimplemented(&analysis.unimplemented()));
    }

    let mut consistent = true;
    if args.consistency {
        let report = analysis.consistency();
        print!("{}", render_consistency(&report));
        consistent = report.is_consistent();
    }

    let exports = [
        (DatabaseFormat::Text, &args.text),
        (DatabaseFormat::Csv, &args.csv),
        (DatabaseFormat::Html, &args.html),
    ];
    let rows = analysis.rows();
    for (format, path) in exports {
        if let Some(path) = path {
            write_database(path, &render_database(&rows, format), format)?;
        }
    }

    Ok(consistent)
}

fn write_database(path: &Path, content: &str, format: DatabaseFormat) -> Result<()> {
    std::fs::write(path, content)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    eprintln!(
        "{} Wrote {} database to {}",
        "OK".green().bold(),
        format.as_str(),
        path.display()
    );
    Ok(())
}
