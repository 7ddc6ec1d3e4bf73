use clap::Parser;
use epost_quote::core::pricing;
use epost_quote::core::ConfigProvider;
use epost_quote::utils::error::ErrorSeverity;
use epost_quote::utils::{logger, validation::Validate};
use epost_quote::{BatchEngine, LocalStorage, ManifestConfig, ManifestPipeline};

#[derive(Parser)]
#[command(name = "batch-quote")]
#[command(about = "Quote every shipment in a TOML manifest")]
struct Args {
    /// Path to the TOML manifest
    #[arg(short, long, default_value = "shipments.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the output directory from the manifest
    #[arg(long)]
    output: Option<String>,

    /// Validate and preview the manifest without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn display_manifest_summary(config: &ManifestConfig, args: &Args) {
    tracing::info!("📋 Batch: {}", config.batch.name);
    if let Some(description) = &config.batch.description {
        tracing::info!("   {}", description);
    }
    tracing::info!("📦 Shipments: {}", config.shipments.len());
    tracing::info!("📁 Output: {} ({})", config.output_path(), config.output.formats.join(", "));
    if let Some(archive) = config.archive_name() {
        tracing::info!("🗜️  Archive: {}", archive);
    }
    if args.dry_run {
        tracing::info!("🔍 Dry run: nothing will be written");
    }
}

fn perform_dry_run(config: &ManifestConfig) {
    for line in config.shipments() {
        match pricing::quote(&line.request) {
            Ok(quote) => println!("✅ {:<12} {:<16} {:>12.2}", line.reference, quote.tier_code, quote.total),
            Err(e) => println!("❌ {:<12} {}", line.reference, e),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match ManifestConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load manifest '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if config.json_logs() {
        logger::init_json_logger(config.log_level());
    } else {
        logger::init_cli_logger(args.verbose || config.log_level() == Some("debug"));
    }

    tracing::info!("🚀 Starting batch quote run");
    tracing::info!("📁 Loaded manifest from: {}", args.config);

    if let Some(output) = &args.output {
        config.output.path = output.clone();
        tracing::info!("🔧 Output directory overridden to: {}", output);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Manifest validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_manifest_summary(&config, &args);

    if args.dry_run {
        perform_dry_run(&config);
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path());
    let pipeline = ManifestPipeline::new(storage, config);
    let engine = BatchEngine::new(pipeline);

    match engine.run().await {
        Ok(outcome) => {
            println!(
                "✅ Quoted {} of {} shipments, grand total {:.2}",
                outcome.summary.quoted, outcome.summary.total_lines, outcome.summary.grand_total
            );
            if outcome.summary.rejected > 0 {
                println!("⚠️  {} shipments rejected, see the output for reasons", outcome.summary.rejected);
            }
            println!("📁 Output saved to: {}", outcome.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Batch quote failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
