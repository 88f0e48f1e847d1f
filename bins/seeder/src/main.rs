//! Mizan demo seeder
//!
//! Replays a fixture of documents into fresh books and prints the resulting
//! statements as JSON. Pass a fixture path to replace the bundled scenario.

mod demo;

use anyhow::Context;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mizan_shared::AppConfig;

use crate::demo::{BUNDLED, Demo};

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Statements go to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let fixture = match std::env::args().nth(1) {
        Some(path) => {
            info!(%path, "Loading fixture");
            std::fs::read_to_string(&path).with_context(|| format!("Failed to read {path}"))?
        }
        None => BUNDLED.to_string(),
    };

    let books = Demo::parse(&fixture)?.seed(config.ledger)?;

    print("trial_balance", &books.trial_balance())?;
    print("balance_sheet", &books.balance_sheet()?)?;
    print("profit_and_loss", &books.profit_and_loss()?)?;
    print("inventory_valuation", &books.inventory_valuation()?)?;
    print("party_reconciliation", &books.reconcile_parties()?)?;

    info!(activity = books.activity_log().len(), "Done");
    Ok(())
}

fn print(title: &str, report: &impl Serialize) -> anyhow::Result<()> {
    println!("== {title}");
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
