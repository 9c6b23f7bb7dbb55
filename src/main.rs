use casamento_rsvp::utils::{logger, validation::Validate};
use casamento_rsvp::{CliConfig, GiftListing, GiftReport, PostgrestStore};
use clap::Parser;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting rsvp-admin");
    if config.verbose {
        tracing::debug!("Store URL: {}", config.store_url);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            casamento_rsvp::utils::error::ErrorSeverity::Low => 0,
            casamento_rsvp::utils::error::ErrorSeverity::Medium => 2,
            casamento_rsvp::utils::error::ErrorSeverity::High => 1,
            casamento_rsvp::utils::error::ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run(config: &CliConfig) -> casamento_rsvp::Result<()> {
    let store = PostgrestStore::new(config.clone());

    if config.report {
        print_report(config, &store).await
    } else {
        print_listing(config, store).await
    }
}

async fn print_report(config: &CliConfig, store: &PostgrestStore<CliConfig>) -> casamento_rsvp::Result<()> {
    use casamento_rsvp::domain::ports::ConfigProvider;

    let report = GiftReport::load(store, config.page_size()).await?;
    let page = report.clamp_page(config.page);

    println!("🎁 Gift report — {} reserved gift(s)", report.len());
    println!("📄 Page {}/{}", page, report.page_count().max(1));
    println!();
    println!("  {:<32} {}", "Presente", "Vai ser dado por");
    println!("  {:<32} {}", "--------", "----------------");
    for row in report.page(page) {
        println!(
            "  {:<32} {}",
            row.gift_name,
            row.claimant_name.as_deref().unwrap_or("—")
        );
    }

    println!();
    if report.has_prev(page) {
        println!("⬅️  --page {}", page - 1);
    }
    if report.has_next(page) {
        println!("➡️  --page {}", page + 1);
    }

    Ok(())
}

async fn print_listing(
    config: &CliConfig,
    store: PostgrestStore<CliConfig>,
) -> casamento_rsvp::Result<()> {
    use casamento_rsvp::domain::ports::ConfigProvider;

    let listing = GiftListing::new(store, config.listing_order());

    loop {
        let gifts = listing.available().await?;

        if gifts.is_empty() {
            println!("🎁 Nenhum presente disponível.");
        } else {
            println!("🎁 {} gift(s) available:", gifts.len());
            for gift in &gifts {
                println!("  • {} ({})", gift.name, gift.id);
            }
        }

        if !config.watch {
            break;
        }
        tokio::time::sleep(Duration::from_secs(config.refresh_seconds)).await;
        println!();
    }

    Ok(())
}
