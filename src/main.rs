use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info, warn};

use nowi_tracker::app::import_use_case::ImportUseCase;
use nowi_tracker::app::scrape_use_case::ScrapeUseCase;
use nowi_tracker::config::Config;
use nowi_tracker::constants;
use nowi_tracker::dashboard::{filter_owners, render_table, DashboardStats};
use nowi_tracker::export::FileExporter;
use nowi_tracker::logging;
use nowi_tracker::pipeline::ImportPipeline;
use nowi_tracker::plss::{self, PlssQueue};
use nowi_tracker::script;
use nowi_tracker::sources;
use nowi_tracker::workbook::WorkbookInput;

#[derive(Parser)]
#[command(name = "nowi_tracker")]
#[command(about = "Piceance Basin non-operated working interest owner tracker")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// PLSS selection shared by the queue-driven commands
#[derive(clap::Args)]
struct QueueArgs {
    /// Comma-separated PLSS tokens, e.g. "6S-95W-12,7S-96W-1"
    #[arg(long)]
    plss: Option<String>,
    /// Queue the Piceance preset (175 locations)
    #[arg(long)]
    preset: bool,
    /// County to search (Garfield or Rio Blanco); defaults to [plss].default_county
    #[arg(long)]
    county: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a PLSS queue and show the estimated scrape time
    Plss {
        #[command(flatten)]
        queue: QueueArgs,
    },
    /// Write the scraper bootstrap script for a PLSS queue
    Script {
        #[command(flatten)]
        queue: QueueArgs,
        /// Where to write the script; defaults to a timestamped file name
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fetch owners for a PLSS queue and save them as an importable sheet
    Scrape {
        #[command(flatten)]
        queue: QueueArgs,
        /// Owner source. Available: mock_ecmc
        #[arg(long, default_value = sources::MOCK_ECMC_SOURCE)]
        source: String,
        /// Output file; defaults to the dated file name under [export].output_dir
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate, normalize and deduplicate an owner workbook
    Import {
        /// .xlsx/.xls/.ods workbook, or a .csv/.tsv/.json sheet
        file: PathBuf,
        /// Sheet to read; defaults to [import].sheet_name, falling back to the first sheet
        #[arg(long)]
        sheet: Option<String>,
        /// Output file for the cleaned owners (.xlsx, .csv, .tsv or .json)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Only report, don't write the cleaned owners
        #[arg(long)]
        no_save: bool,
    },
    /// Import a workbook and show owner statistics
    Dashboard {
        file: PathBuf,
        #[arg(long)]
        sheet: Option<String>,
        /// Only list owners matching this text
        #[arg(long)]
        search: Option<String>,
        /// Maximum owners to list
        #[arg(long, default_value_t = 25)]
        limit: usize,
    },
}

fn build_queue(args: &QueueArgs, config: &Config) -> anyhow::Result<PlssQueue> {
    let mut queue = if args.preset {
        PlssQueue::piceance_preset()
    } else {
        PlssQueue::new(plss::resolve_county(&config.plss.default_county)?)
    };
    if let Some(list) = &args.plss {
        let added = queue.extend_from_list(list)?;
        info!("Queued {} new PLSS entries", added);
    }
    if let Some(county) = &args.county {
        queue.set_county(plss::resolve_county(county)?);
    }
    Ok(queue)
}

fn exporter(path: Option<PathBuf>, config: &Config) -> anyhow::Result<FileExporter> {
    FileExporter::for_target(
        path,
        config.export.output_dir.clone(),
        config.export.include_contacts,
    )
    .context("Unsupported output file")
}

fn print_queue(queue: &PlssQueue) {
    println!("\n🗺️  PLSS queue ({} County):", queue.county().unwrap_or(constants::GARFIELD));
    for token in queue.entries() {
        println!("   {}  ({})", token, token.dsu_key());
    }
    println!("   Entries: {}", queue.len());
    println!("   Estimated time: ~{} minutes", queue.estimated_minutes());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;

    match cli.command {
        Commands::Plss { queue } => {
            let queue = build_queue(&queue, &config)?;
            print_queue(&queue);
            let command = script::custom_command(&queue);
            if !command.is_empty() {
                println!("\n▶️  {}", command);
            }
        }
        Commands::Script { queue, output } => {
            let queue = build_queue(&queue, &config)?;
            let path = output
                .unwrap_or_else(|| PathBuf::from(script::script_file_name(chrono::Utc::now())));

            std::fs::write(&path, script::render_bootstrap_script(&queue))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
            }
            info!("Wrote bootstrap script to {}", path.display());

            println!("📜 Bootstrap script written to {}", path.display());
            let command = script::custom_command(&queue);
            if !command.is_empty() {
                println!("   Custom: {}", command);
            }
            println!("   Preset: {}", script::preset_command());
        }
        Commands::Scrape { queue, source, output } => {
            let queue = build_queue(&queue, &config)?;
            let Some(owner_source) = sources::create_source(&source, &config.scrape) else {
                warn!("Unknown source specified");
                bail!(
                    "Unknown source: {} (available: {})",
                    source,
                    sources::get_supported_sources().join(", ")
                );
            };

            println!("🔄 Scraping {} locations (~{} minutes)...", queue.len(), queue.estimated_minutes());
            let use_case = ScrapeUseCase::new(owner_source, Box::new(exporter(output, &config)?));
            let report = use_case.execute(&queue).await?;

            println!("\n📊 Scrape Results ({}):", report.source);
            println!("   County: {}", report.county);
            println!("   Locations: {}", report.locations);
            println!("   Owners: {}", report.owners);
            println!("   Output file: {}", report.output_file);
        }
        Commands::Import { file, sheet, output, no_save } => {
            let sheet = sheet.unwrap_or_else(|| config.import.sheet_name.clone());
            let mut use_case = ImportUseCase::new(
                Box::new(WorkbookInput::new(file.clone(), sheet)),
                ImportPipeline::from_config(&config.import),
            );
            if !no_save {
                use_case = use_case.with_output(Box::new(exporter(output, &config)?));
            }

            println!("📥 Importing {}...", file.display());
            let report = match use_case.execute().await {
                Ok(report) => report,
                Err(e) => {
                    error!("Import failed: {}", e);
                    println!("❌ Import failed: {}", e);
                    return Err(e.into());
                }
            };

            let summary = &report.outcome.summary;
            println!("\n📊 Import Results:");
            println!("   Total rows: {}", summary.total);
            println!("   Imported: {}", summary.successful);
            println!("   Duplicates removed: {}", summary.duplicates_removed);
            println!("   Errors: {}", summary.error_count);
            if let Some(file) = &report.output_file {
                println!("   Output file: {}", file);
            }

            if !summary.errors.is_empty() {
                println!("\n⚠️  Errors encountered:");
                for error in &summary.errors {
                    println!("   - {}", error);
                }
                if summary.has_hidden_errors() {
                    println!("   ... and {} more errors", summary.error_count - summary.errors.len());
                }
            }
        }
        Commands::Dashboard { file, sheet, search, limit } => {
            let sheet = sheet.unwrap_or_else(|| config.import.sheet_name.clone());
            let use_case = ImportUseCase::new(
                Box::new(WorkbookInput::new(file.clone(), sheet)),
                ImportPipeline::from_config(&config.import),
            );
            let report = use_case.execute().await?;
            let owners = &report.outcome.owners;

            println!("📈 NOWI Dashboard: {}", file.display());
            print!("{}", DashboardStats::from_owners(owners).render());

            let matches = filter_owners(owners, search.as_deref().unwrap_or(""));
            let shown: Vec<_> = matches.iter().copied().take(limit).collect();
            println!();
            print!("{}", render_table(&shown));
            if matches.len() > shown.len() {
                println!("... {} more owners", matches.len() - shown.len());
            }
        }
    }
    Ok(())
}
