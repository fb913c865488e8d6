use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use perks::{config::Config, seed::load_defaults, state::State};
use tracing_subscriber::{EnvFilter, fmt};

/// Pre-loads membership types and the demo user's perks.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Redis to seed, defaults to REDIS_URL
    #[arg(long)]
    redis_url: Option<String>,

    /// Date the demo perk expiries count from, defaults to today
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let mut config = Config::load();
    if let Some(redis_url) = args.redis_url {
        config.redis_url = redis_url;
    }

    let state = State::connect(config)
        .await
        .context("Failed to connect to Redis")?;

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let report = load_defaults(&state, today)
        .await
        .context("Failed to load defaults")?;

    if report.membership_types == 0 && report.perks == 0 {
        println!("Defaults already present. Exiting.");
    } else {
        println!("Membership types loaded: {}", report.membership_types);
        println!("Demo perks created: {}", report.perks);
    }

    Ok(())
}
