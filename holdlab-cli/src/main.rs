//! HoldLab CLI: validate holdings extracts, generate synthetic ones, inspect reference data.
//!
//! Commands:
//! - `validate`: validate one or more holdings CSV files and save reports
//! - `generate`: write a seeded synthetic holdings CSV, optionally with
//!   performance and attribute tables
//! - `reference`: show which reference tables would be used

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use holdlab_core::data::{write_holdings_csv, write_records_csv};
use holdlab_core::ValidationOptions;
use holdlab_runner::{
    load_reference_data, run_validation, save_artifacts, synthesize, synthesize_attributes,
    synthesize_performance, upload, validate_files, CsvFileSink, PipelineConfig, PipelineRun,
    ReferenceData,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "holdlab",
    about = "HoldLab CLI: holdings validation and price imputation"
)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate holdings CSV files and save a report per file.
    Validate {
        /// CSV files to validate.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output directory for reports. Overrides `[output] dir`.
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Reference date for the HISTORYDATE window (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        as_of: Option<String>,

        /// Append cleaned rows to this CSV file.
        #[arg(long)]
        sink: Option<PathBuf>,

        /// Exit with an error if any file has validation issues.
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// Generate a synthetic holdings CSV.
    Generate {
        /// Output CSV path.
        #[arg(long)]
        output: PathBuf,

        /// Maximum number of rows. Overrides `[synthetic] max_count`.
        #[arg(long)]
        count: Option<usize>,

        /// RNG seed. Overrides `[synthetic] seed`.
        #[arg(long)]
        seed: Option<u64>,

        /// Comma-separated portfolio codes. Overrides `[synthetic] portfolio_codes`.
        #[arg(long, value_delimiter = ',')]
        portfolio_codes: Option<Vec<String>>,

        /// History dates per ticker. Overrides `[synthetic] observations_per_ticker`.
        #[arg(long)]
        observations: Option<usize>,

        /// Validate the generated data and print the summary.
        #[arg(long, default_value_t = false)]
        validate: bool,

        /// Also write a monthly performance CSV for the portfolio codes.
        #[arg(long)]
        performance: Option<PathBuf>,

        /// Also write a portfolio attributes CSV for the portfolio codes.
        #[arg(long)]
        attributes: Option<PathBuf>,
    },
    /// Show which reference tables are in effect.
    Reference {
        /// Print sources as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Print the currency table as CURRENCYLOOKUP CSV rows.
        #[arg(long, default_value_t = false, conflicts_with = "json")]
        lookup: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate {
            files,
            output_dir,
            as_of,
            sink,
            strict,
        } => run_validate(&config, &files, output_dir, as_of, sink, strict),
        Commands::Generate {
            output,
            count,
            seed,
            portfolio_codes,
            observations,
            validate,
            performance,
            attributes,
        } => {
            let mut config = config;
            if let Some(count) = count {
                config.synthetic.max_count = count;
            }
            if let Some(seed) = seed {
                config.synthetic.seed = seed;
            }
            if let Some(codes) = portfolio_codes {
                config.synthetic.portfolio_codes = codes;
            }
            if let Some(n) = observations {
                if n == 0 {
                    bail!("--observations must be at least 1");
                }
                config.synthetic.observations_per_ticker = n;
            }
            run_generate(&config, &output, validate)?;
            if let Some(path) = performance {
                let rows = synthesize_performance(&config.synthetic);
                write_csv_file(&path, &rows)?;
                println!("Wrote {} performance rows to {}", rows.len(), path.display());
            }
            if let Some(path) = attributes {
                let rows = synthesize_attributes(&config.synthetic);
                write_csv_file(&path, &rows)?;
                println!("Wrote {} attribute rows to {}", rows.len(), path.display());
            }
            Ok(())
        }
        Commands::Reference { json, lookup } => run_reference(&config, json, lookup),
    }
}

fn parse_as_of(as_of: Option<String>) -> Result<ValidationOptions> {
    match as_of {
        Some(s) => {
            let date = NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .with_context(|| format!("invalid --as-of date '{s}'"))?;
            Ok(ValidationOptions::as_of(date))
        }
        None => Ok(ValidationOptions::default()),
    }
}

fn print_summary(run: &PipelineRun, limit: usize) {
    println!("{}: {} rows", run.label, run.row_count);
    if run.imputed_prices > 0 {
        println!("  Imputed prices: {}", run.imputed_prices);
    }
    if run.coerced_cells > 0 {
        println!("  Non-numeric cells read as null: {}", run.coerced_cells);
    }
    println!("  Dataset hash: {}", run.dataset_hash);
    println!("{}", run.summary(limit));
}

fn run_validate(
    config: &PipelineConfig,
    files: &[PathBuf],
    output_dir: Option<PathBuf>,
    as_of: Option<String>,
    sink_path: Option<PathBuf>,
    strict: bool,
) -> Result<()> {
    let options = parse_as_of(as_of)?;
    let output_dir = output_dir.unwrap_or_else(|| config.output.dir.clone());
    let reference = load_reference_data(&config.reference);
    let mut sink = sink_path.map(CsvFileSink::new);

    let mut failed = 0;
    let mut with_issues = 0;
    for (path, result) in validate_files(files, &reference, &options) {
        let run = match result {
            Ok(run) => run,
            Err(e) => {
                error!(path = %path.display(), error = %e, "validation failed");
                failed += 1;
                continue;
            }
        };

        print_summary(&run, config.validation.max_displayed_issues);
        let run_dir = save_artifacts(&run, &output_dir)?;
        println!("Artifacts saved to: {}", run_dir.display());

        if !run.is_clean() {
            with_issues += 1;
        }
        if run.schema_mismatch() {
            continue;
        }
        if let Some(sink) = sink.as_mut() {
            let written = upload(&run, sink)?;
            println!("Uploaded {written} rows to {}", sink.path().display());
        }
    }

    if failed > 0 {
        bail!("{failed} of {} files could not be read", files.len());
    }
    if strict && with_issues > 0 {
        bail!("{with_issues} of {} files have validation issues", files.len());
    }
    Ok(())
}

fn create_output_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::File::create(path).with_context(|| format!("failed to create {}", path.display()))
}

fn write_csv_file<T: serde::Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    write_records_csv(rows, create_output_file(path)?)?;
    info!(path = %path.display(), rows = rows.len(), "wrote synthetic table");
    Ok(())
}

fn run_generate(config: &PipelineConfig, output: &Path, validate: bool) -> Result<()> {
    let reference = load_reference_data(&config.reference);
    let today = chrono::Local::now().date_naive();
    let dataset = synthesize(&config.synthetic, &reference, today)?;

    write_holdings_csv(&dataset, create_output_file(output)?)?;
    info!(path = %output.display(), rows = dataset.len(), "wrote synthetic holdings");
    println!("Wrote {} rows to {}", dataset.len(), output.display());

    if validate {
        let run = run_validation(
            "synthetic",
            &dataset,
            &reference,
            &ValidationOptions::as_of(today),
        );
        print_summary(&run, config.validation.max_displayed_issues);
    }
    Ok(())
}

fn run_reference(config: &PipelineConfig, json: bool, lookup: bool) -> Result<()> {
    let ReferenceData {
        currencies,
        regions,
        sources,
    } = load_reference_data(&config.reference);

    if json {
        println!("{}", serde_json::to_string_pretty(&sources)?);
        return Ok(());
    }
    if lookup {
        write_records_csv(&currencies.lookup_rows(), std::io::stdout().lock())?;
        return Ok(());
    }

    println!("Currencies: {} ({})", currencies.len(), sources.currencies);
    for code in currencies.codes() {
        let limits = currencies.limits_for(Some(code));
        println!(
            "  {code:<4} price {}-{}  cost basis <= {}",
            limits.price_min, limits.price_max, limits.costbasis_max
        );
    }
    println!(
        "Countries: {} in {} regions ({})",
        regions.len(),
        regions.regions().len(),
        sources.country_regions
    );
    for country in regions.countries() {
        println!("  {country:<16} {}", regions.region_for(country).unwrap_or("-"));
    }
    Ok(())
}
