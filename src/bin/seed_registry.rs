use anyhow::Context;
use casamento_rsvp::config::site_config::{SeedConfig, SiteConfig};
use casamento_rsvp::domain::ports::{GiftStore, GuestStore};
use casamento_rsvp::utils::{logger, validation};
use casamento_rsvp::PostgrestStore;
use clap::Parser;

#[derive(Parser)]
#[command(name = "seed-registry")]
#[command(about = "One-off admin seeding of gifts, guests and companions")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "site-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Dry run - show what would be inserted without writing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🌱 Starting registry seeding");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let config = SiteConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if let Err(e) = validation::Validate::validate(&config) {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let seed = validation::validate_required_field("seed", &config.seed)
        .context("config has no [seed] section")?
        .clone();

    display_seed_summary(&seed, args.dry_run);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing was written");
        return Ok(());
    }

    let store = PostgrestStore::new(config.clone());

    for name in &seed.gifts {
        let id = store.insert_gift(name).await?;
        tracing::info!("🎁 Gift '{}' inserted as {}", name, id);
    }

    for guest in &seed.guests {
        let guest_id = store.insert_guest(&guest.name).await?;
        tracing::info!("💌 Guest '{}' inserted as {}", guest.name, guest_id);
        println!("🔗 Link for {}: /convidado/{}", guest.name, guest_id);

        for companion in &guest.companions {
            let inserted = store.insert_companion(&guest_id, companion).await?;
            tracing::info!("  👤 Companion '{}' inserted as {}", companion, inserted.id);
        }
    }

    println!(
        "✅ Seeding complete: {} gift(s), {} guest(s)",
        seed.gifts.len(),
        seed.guests.len()
    );

    Ok(())
}

fn display_seed_summary(seed: &SeedConfig, dry_run: bool) {
    println!("📋 Seed Summary:");
    println!("  Gifts: {}", seed.gifts.len());
    println!(
        "  Guests: {} ({} companions)",
        seed.guests.len(),
        seed.guests.iter().map(|g| g.companions.len()).sum::<usize>()
    );

    if dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
