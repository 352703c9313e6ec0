//! rxlens command-line interface
//!
//! Thin transport over the in-process resolver APIs: interaction checks,
//! dosage by age, alternatives, medicine lookup against the two-tier
//! directory, the openFDA feed import, and an order round trip.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use rxlens::config;
use rxlens::db::{import, MedicineStore};
use rxlens::models::OrderRequest;
use rxlens::{Formulary, MedicineDirectory, OrderBook, ReferenceTable};

#[derive(Parser)]
#[command(name = "rxlens", about = "Prescription analysis toolkit", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report known pairwise interaction warnings among the given drugs
    Interactions {
        #[arg(required = true)]
        drugs: Vec<String>,
    },
    /// Age-banded dosage recommendation for one drug
    Dosage {
        drug: String,
        #[arg(long)]
        age: i32,
    },
    /// Known substitutes for one drug
    Alternatives { drug: String },
    /// Medicine details from the reference table, falling back to the bulk store
    Info { drug: String },
    /// Load a parsed openFDA label feed into the bulk store
    Import { file: PathBuf },
    /// Place an order and echo its stored record
    Order {
        #[arg(required = true)]
        drugs: Vec<String>,
        #[arg(long)]
        patient: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        mobile: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::load_config();

    match cli.command {
        Command::Interactions { drugs } => {
            let found = Formulary::builtin().check_interactions(&drugs);
            println!("{}", serde_json::to_string_pretty(&json!({ "interactions": found }))?);
        }
        Command::Dosage { drug, age } => match Formulary::builtin().dosage_for(&drug, age) {
            Some(rec) => println!("{}", serde_json::to_string_pretty(&rec)?),
            None => println!("{}", json!({ "error": "Drug not found" })),
        },
        Command::Alternatives { drug } => {
            let found = Formulary::builtin().alternatives_for(&drug);
            println!("{}", serde_json::to_string_pretty(&found)?);
        }
        Command::Info { drug } => {
            let store = MedicineStore::connect(&config.database_url)
                .await
                .with_context(|| format!("opening bulk store at {}", config.database_url))?;
            let directory = MedicineDirectory::new(vec![
                Arc::new(ReferenceTable::builtin()),
                Arc::new(store),
            ]);

            match directory.lookup(&drug).await? {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => println!("{}", json!({ "error": "Medicine not found" })),
            }
        }
        Command::Import { file } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("reading feed file {}", file.display()))?;
            let feed: serde_json::Value =
                serde_json::from_slice(&bytes).context("parsing feed JSON")?;

            let store = MedicineStore::connect(&config.database_url)
                .await
                .with_context(|| format!("opening bulk store at {}", config.database_url))?;
            let inserted = import::load_feed(&store, &feed).await?;

            println!(
                "{}",
                json!({ "inserted": inserted, "total": store.count().await? })
            );
        }
        Command::Order {
            drugs,
            patient,
            location,
            mobile,
        } => {
            let book = OrderBook::new();
            let placed = book.place(OrderRequest {
                drugs,
                patient_name: patient,
                location,
                mobile_number: mobile,
            })?;
            // The book is process-local, so echo the stored record too.
            let order = book.status(&placed.order_id);
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "placed": placed, "order": order }))?
            );
        }
    }

    Ok(())
}
