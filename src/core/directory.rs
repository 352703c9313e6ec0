use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use thiserror::Error;
use tracing::instrument;

use crate::models::{normalize_name, MedicineRecord};

/// Failure of a medicine source. Not-found is never an error; these cover
/// genuinely exceptional conditions (unreachable or corrupt backing store),
/// surfaced to the caller instead of crashing the process.
#[derive(Debug, Error)]
pub enum StoreError {
    #[cfg(feature = "sqlite")]
    #[error("bulk medicine store query failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error("medicine source failed: {0}")]
    Source(String),
}

/// One tier of medicine records, keyed by normalized drug name.
#[async_trait]
pub trait MedicineSource: Send + Sync {
    async fn get(&self, name: &str) -> Result<Option<MedicineRecord>, StoreError>;
}

// ===== Authoritative reference table =====

static BUILTIN_REFERENCE: Lazy<HashMap<String, MedicineRecord>> = Lazy::new(|| {
    let records = [
        MedicineRecord {
            name: "Aspirin".to_string(),
            description: "Aspirin is a nonsteroidal anti-inflammatory drug (NSAID) used to reduce pain, fever, and inflammation.".to_string(),
            uses: "Pain relief (headaches, muscle aches, etc.), fever reduction, and prevention of blood clots (at low doses).".to_string(),
            side_effects: "Stomach upset, heartburn, nausea, and increased risk of bleeding.".to_string(),
        },
        MedicineRecord {
            name: "Ibuprofen".to_string(),
            description: "Ibuprofen is an NSAID used to relieve pain, fever, and inflammation.".to_string(),
            uses: "Used for headaches, menstrual cramps, dental pain, and arthritis.".to_string(),
            side_effects: "Stomach pain, nausea, vomiting, dizziness, and rash.".to_string(),
        },
        MedicineRecord {
            name: "Acetaminophen".to_string(),
            description: "Acetaminophen (also known as Paracetamol) is a pain reliever and fever reducer.".to_string(),
            uses: "Treats mild to moderate pain (headaches, backaches) and reduces fever.".to_string(),
            side_effects: "Rarely causes side effects at recommended doses, but can cause liver damage in large amounts.".to_string(),
        },
        MedicineRecord {
            name: "Paracetamol".to_string(),
            description: "Paracetamol (also known as Acetaminophen) is a pain reliever and fever reducer.".to_string(),
            uses: "Treats mild to moderate pain (headaches, backaches) and reduces fever.".to_string(),
            side_effects: "Rarely causes side effects at recommended doses, but can cause liver damage in large amounts.".to_string(),
        },
    ];

    records
        .into_iter()
        .map(|r| (normalize_name(&r.name), r))
        .collect()
});

/// Small in-memory authoritative table. Always consulted before any bulk
/// tier, and its records win verbatim on overlap.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    records: HashMap<String, MedicineRecord>,
}

impl ReferenceTable {
    pub fn new(records: HashMap<String, MedicineRecord>) -> Self {
        Self { records }
    }

    /// The built-in authoritative records for the key medicines.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_REFERENCE.clone())
    }
}

#[async_trait]
impl MedicineSource for ReferenceTable {
    async fn get(&self, name: &str) -> Result<Option<MedicineRecord>, StoreError> {
        Ok(self.records.get(&normalize_name(name)).cloned())
    }
}

// ===== Two-tier directory =====

/// Ordered list of medicine sources tried in sequence; the first tier that
/// has the name wins and later tiers are not consulted.
///
/// Typical wiring is `ReferenceTable::builtin()` first and the bulk SQLite
/// store second, matching the authoritative-then-imported precedence.
pub struct MedicineDirectory {
    sources: Vec<Arc<dyn MedicineSource>>,
}

impl MedicineDirectory {
    pub fn new(sources: Vec<Arc<dyn MedicineSource>>) -> Self {
        Self { sources }
    }

    #[instrument(skip(self), fields(drug = %name))]
    pub async fn lookup(&self, name: &str) -> Result<Option<MedicineRecord>, StoreError> {
        for source in &self.sources {
            if let Some(record) = source.get(name).await? {
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Map-backed bulk tier stand-in.
    struct MapSource(HashMap<String, MedicineRecord>);

    #[async_trait]
    impl MedicineSource for MapSource {
        async fn get(&self, name: &str) -> Result<Option<MedicineRecord>, StoreError> {
            Ok(self.0.get(&normalize_name(name)).cloned())
        }
    }

    /// Source whose backing store is broken.
    struct BrokenSource;

    #[async_trait]
    impl MedicineSource for BrokenSource {
        async fn get(&self, _name: &str) -> Result<Option<MedicineRecord>, StoreError> {
            Err(StoreError::Source("backing store unreadable".to_string()))
        }
    }

    fn record(name: &str, description: &str) -> MedicineRecord {
        MedicineRecord {
            name: name.to_string(),
            description: description.to_string(),
            uses: "test uses".to_string(),
            side_effects: "test side effects".to_string(),
        }
    }

    #[tokio::test]
    async fn reference_table_wins_over_bulk_tier() {
        let mut bulk = HashMap::new();
        bulk.insert(
            "aspirin".to_string(),
            record("aspirin", "bulk-imported shadow of aspirin"),
        );

        let directory = MedicineDirectory::new(vec![
            Arc::new(ReferenceTable::builtin()),
            Arc::new(MapSource(bulk)),
        ]);

        let found = directory.lookup("Aspirin").await.unwrap().unwrap();
        assert_eq!(found.name, "Aspirin");
        assert!(found.description.starts_with("Aspirin is a nonsteroidal"));
    }

    #[tokio::test]
    async fn falls_through_to_bulk_tier() {
        let mut bulk = HashMap::new();
        bulk.insert(
            "naproxen".to_string(),
            record("naproxen", "bulk-imported naproxen"),
        );

        let directory = MedicineDirectory::new(vec![
            Arc::new(ReferenceTable::builtin()),
            Arc::new(MapSource(bulk)),
        ]);

        let found = directory.lookup("NAPROXEN").await.unwrap().unwrap();
        assert_eq!(found.description, "bulk-imported naproxen");
    }

    #[tokio::test]
    async fn miss_in_every_tier_is_none() {
        let directory = MedicineDirectory::new(vec![
            Arc::new(ReferenceTable::builtin()),
            Arc::new(MapSource(HashMap::new())),
        ]);

        assert!(directory.lookup("unobtainium").await.unwrap().is_none());
        assert!(directory.lookup("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn broken_tier_surfaces_structured_error() {
        let directory = MedicineDirectory::new(vec![
            Arc::new(ReferenceTable::builtin()),
            Arc::new(BrokenSource),
        ]);

        // Reference hit short-circuits before the broken tier.
        assert!(directory.lookup("ibuprofen").await.is_ok());

        // A miss reaches the broken tier and reports its failure.
        let err = directory.lookup("unobtainium").await.unwrap_err();
        assert!(matches!(err, StoreError::Source(_)));
    }
}
