mod display;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use kontrak_core::normalize::{format_phone, format_tax_id, is_valid_phone};
use kontrak_core::{
    BackendContract, Strictness, ValidationReport, normalize, normalize_phone, normalize_tax_id,
    summarize, to_form, validate,
};
use tracing_subscriber::{filter::LevelFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "kontrak", version, about = "Validate and summarise extracted contracts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase logging verbosity (-v, -vv).
    #[arg(global = true, short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate an extraction JSON file.
    Validate {
        file: PathBuf,
        /// Apply the confirmation rules instead of the load rules.
        #[arg(long, env = "KONTRAK_STRICT")]
        strict: bool,
        /// Print the validation report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the editable form shape of an extraction JSON file.
    Form { file: PathBuf },
    /// Print cost breakdowns, duration and termin schedule.
    Summary { file: PathBuf },
    /// Normalise and format a tax ID (NPWP).
    Npwp { value: String },
    /// Normalise and format a phone number.
    Phone { value: String },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let subscriber = fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::warn!("tracing subscriber already set");
    }
}

fn load(path: &Path) -> anyhow::Result<BackendContract> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let doc = BackendContract::from_json_str(&json)
        .with_context(|| format!("parsing {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        items = doc.rincian_layanan.len(),
        "loaded contract"
    );
    Ok(doc)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    tracing::debug!("kontrak v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Validate { file, strict, json } => {
            let doc = load(&file)?;
            let strictness = if strict {
                Strictness::Strict
            } else {
                Strictness::Lenient
            };
            let result = validate(&doc, strictness);
            let ok = result.is_ok();
            if json {
                let report = ValidationReport::from(result);
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                display::print_validation(&result);
            }
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::Form { file } => {
            let doc = load(&file)?;
            println!("{}", serde_json::to_string_pretty(&to_form(&doc))?);
        }
        Commands::Summary { file } => {
            let doc = normalize(&load(&file)?);
            display::print_summary(&doc, &summarize(&doc));
        }
        Commands::Npwp { value } => {
            let n = normalize_tax_id(&value);
            match n.error {
                Some(err) => println!("invalid: {err}"),
                None => println!("{} ({} digits)", format_tax_id(&n.value), n.digit_count),
            }
        }
        Commands::Phone { value } => {
            let normalized = normalize_phone(&value);
            if is_valid_phone(&normalized) {
                println!("{}", format_phone(&normalized));
            } else {
                println!("invalid: {normalized:?} is not +62 followed by 8 to 13 digits");
            }
        }
    }

    Ok(())
}
