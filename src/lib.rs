//! rxlens core library
//!
//! Prescription analysis toolkit: pure drug-knowledge resolvers
//! (interactions, dosage by age, alternatives), a two-tier medicine
//! directory backed by an authoritative table and a bulk-imported SQLite
//! store, the OCR/NER extraction boundary, and an in-memory order tracker.

pub mod core;
#[cfg(feature = "sqlite")]
pub mod db;
pub mod models;
pub mod orders;

pub use crate::core::directory::{MedicineDirectory, MedicineSource, ReferenceTable, StoreError};
pub use crate::core::extract::{EntityTagger, PrescriptionReader, TextExtractor};
pub use crate::core::formulary::Formulary;
pub use crate::orders::OrderBook;

/// Application configuration
pub mod config {
    const DEFAULT_DATABASE_URL: &str = "sqlite:medicines.db";

    #[derive(Debug, Clone)]
    pub struct Config {
        /// sqlx URL of the bulk medicine store.
        pub database_url: String,
    }

    /// Read configuration from the environment (`RXLENS_DATABASE_URL`),
    /// falling back to the local SQLite file.
    pub fn load_config() -> Config {
        Config {
            database_url: std::env::var("RXLENS_DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
        }
    }
}
