//! Field-derivation contract for the openFDA drug label feed.
//!
//! The large-file streaming pipeline lives outside this crate; what lives
//! here is the mapping from one parsed label object to a `medicines` row,
//! and the first-wins load into the store. The key prefers the generic
//! name over the brand name; labels with neither are dropped.

use serde_json::Value;
use tracing::{info, instrument};

use crate::core::directory::StoreError;
use crate::db::MedicineStore;
use crate::models::{normalize_name, MedicineRecord};

/// Sentinel stored when a label has no usable text for a field.
pub const NOT_AVAILABLE: &str = "Not available.";

/// Derive a medicine record from one openFDA label object.
///
/// Returns `None` when no name can be resolved. `uses` and `description`
/// share the same source text; `side_effects` takes the first non-empty of
/// adverse reactions, warnings, then precautions.
pub fn record_from_label(label: &Value) -> Option<MedicineRecord> {
    let name = label_name(label)?;

    let uses = first_text(label, &["indications_and_usage", "pharmacology_and_toxicology"])
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    let side_effects = first_text(label, &["adverse_reactions", "warnings", "precautions"])
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Some(MedicineRecord {
        name,
        description: uses.clone(),
        uses,
        side_effects,
    })
}

/// Normalized key for a label: generic name first, brand name as fallback.
fn label_name(label: &Value) -> Option<String> {
    let openfda = label.get("openfda")?;

    for key in ["generic_name", "brand_name"] {
        if let Some(first) = openfda
            .get(key)
            .and_then(Value::as_array)
            .and_then(|names| names.first())
            .and_then(Value::as_str)
        {
            let name = normalize_name(first);
            if !name.is_empty() {
                return Some(name);
            }
        }
    }

    None
}

/// First non-empty text among the given label fields, each a list of
/// paragraphs joined with a single space.
fn first_text(label: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(paragraphs) = label.get(*key).and_then(Value::as_array) {
            let text = paragraphs
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    None
}

/// Load a parsed feed (`{"results": [...]}`) into the store. Labels with
/// no resolvable name are skipped; duplicate keys keep the first record.
/// Returns the number of rows actually inserted.
#[instrument(skip(store, feed))]
pub async fn load_feed(store: &MedicineStore, feed: &Value) -> Result<u64, StoreError> {
    let labels = feed
        .get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let mut inserted = 0u64;
    let mut skipped = 0u64;

    for label in labels {
        match record_from_label(label) {
            Some(record) => {
                if store.insert_ignore(&record).await? {
                    inserted += 1;
                }
            }
            None => skipped += 1,
        }
    }

    info!(inserted, skipped, total = labels.len(), "bulk feed loaded");
    Ok(inserted)
}
