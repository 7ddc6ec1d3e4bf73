use clap::Parser;
use epost_quote::adapters::http;
use epost_quote::core::pricing;
use epost_quote::utils::error::{ErrorSeverity, PostalError};
use epost_quote::utils::{logger, validation::Validate};
use epost_quote::{CliConfig, QuoteResult};

fn print_rate_card(json: bool) -> Result<(), PostalError> {
    if json {
        println!("{}", serde_json::to_string_pretty(pricing::rate_card())?);
        return Ok(());
    }

    println!("{:<16} {:<14} {:>8} {:>10}", "TIER", "SCOPE", "BASE", "MAX KG");
    for tier in pricing::rate_card() {
        println!(
            "{:<16} {:<14} {:>8.2} {:>10}",
            tier.code, tier.scope, tier.base_rate, tier.max_weight_kg
        );
    }
    Ok(())
}

fn print_quote(quote: &QuoteResult, json: bool) -> Result<(), PostalError> {
    if json {
        let output = serde_json::json!({
            "quote": quote,
            "breakdown": quote.breakdown(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let b = quote.breakdown();
    println!("📦 {} ({})", quote.tier_code, quote.scope);
    println!("  Base rate               {:>12.2}", b.base_rate);
    println!("  Weight charge           {:>12.2}", b.weight_charge);
    println!("  Volume charge           {:>12.2}", b.volume_charge);
    println!("  Insurance charge        {:>12.2}", b.insurance_charge);
    println!("  International surcharge {:>12.2}", b.international_surcharge);
    println!("  Total                   {:>12.2}", b.total);
    Ok(())
}

fn run(config: &CliConfig) -> Result<(), PostalError> {
    if config.rate_card {
        return print_rate_card(config.json);
    }

    let quote = match &config.body {
        Some(path) => {
            tracing::debug!("Reading order body from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let body: serde_json::Value = serde_json::from_str(&content)?;
            http::quote_from_json(&body)?
        }
        None => pricing::quote(&config.to_request()?)?,
    };

    tracing::debug!("Quote total {:.2} for {}", quote.total, quote.tier_code);
    print_quote(&quote, config.json)
}

fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&config) {
        tracing::debug!(
            "Quote failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}
