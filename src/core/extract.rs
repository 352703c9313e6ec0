use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};

use crate::models::normalize_name;

/// Failure of the external OCR/NER pipeline. These are the excluded
/// collaborators' problems surfaced as typed values; nothing here is
/// process-fatal.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("NER model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("extraction failed: {0}")]
    Failed(String),
}

/// An entity span tagged by the NER model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedSpan {
    pub category: String, // e.g., "Drug", "Chemical", "Disease"
    pub text: String,
}

/// Black-box OCR engine: image bytes in, text out.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, image: &[u8]) -> Result<String, ExtractError>;
}

/// Black-box NER model: text in, tagged spans out.
#[async_trait]
pub trait EntityTagger: Send + Sync {
    async fn tag_entities(&self, text: &str) -> Result<Vec<TaggedSpan>, ExtractError>;
}

/// Result of reading one prescription image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    pub extracted_drugs: Vec<String>,
    pub raw_text: String,
}

/// Composes the OCR and NER collaborators and filters their output down to
/// known drugs.
///
/// A span survives only if its category is drug or chemical
/// (case-insensitive) AND its normalized text is in the known-drug set
/// (the dosage-table keys); everything else is NER noise. Results are
/// deduplicated and sorted.
pub struct PrescriptionReader {
    ocr: Arc<dyn TextExtractor>,
    ner: Arc<dyn EntityTagger>,
    known_drugs: HashSet<String>,
}

impl PrescriptionReader {
    pub fn new(
        ocr: Arc<dyn TextExtractor>,
        ner: Arc<dyn EntityTagger>,
        known_drugs: HashSet<String>,
    ) -> Self {
        Self {
            ocr,
            ner,
            known_drugs,
        }
    }

    #[instrument(skip(self, image), fields(image_bytes = image.len()))]
    pub async fn read(&self, image: &[u8]) -> Result<Extraction, ExtractError> {
        let raw_text = self.ocr.extract_text(image).await?;
        let spans = self.ner.tag_entities(&raw_text).await?;

        let mut drugs = BTreeSet::new();
        for span in spans {
            let category = span.category.to_lowercase();
            if category != "drug" && category != "chemical" {
                continue;
            }
            let name = normalize_name(&span.text);
            if self.known_drugs.contains(&name) {
                drugs.insert(name);
            }
        }

        info!(drugs = drugs.len(), "prescription read");

        Ok(Extraction {
            extracted_drugs: drugs.into_iter().collect(),
            raw_text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formulary::Formulary;

    struct FixedOcr(Option<String>);

    #[async_trait]
    impl TextExtractor for FixedOcr {
        async fn extract_text(&self, _image: &[u8]) -> Result<String, ExtractError> {
            self.0
                .clone()
                .ok_or_else(|| ExtractError::EngineUnavailable("tesseract not installed".into()))
        }
    }

    struct FixedNer(Vec<TaggedSpan>);

    #[async_trait]
    impl EntityTagger for FixedNer {
        async fn tag_entities(&self, _text: &str) -> Result<Vec<TaggedSpan>, ExtractError> {
            Ok(self.0.clone())
        }
    }

    fn span(category: &str, text: &str) -> TaggedSpan {
        TaggedSpan {
            category: category.to_string(),
            text: text.to_string(),
        }
    }

    fn reader(ocr_text: &str, spans: Vec<TaggedSpan>) -> PrescriptionReader {
        PrescriptionReader::new(
            Arc::new(FixedOcr(Some(ocr_text.to_string()))),
            Arc::new(FixedNer(spans)),
            Formulary::builtin().known_drugs(),
        )
    }

    #[tokio::test]
    async fn keeps_only_drug_or_chemical_spans() {
        let reader = reader(
            "Rx: Aspirin 100mg daily for headache",
            vec![
                span("Drug", "Aspirin"),
                span("Disease", "headache"),
                span("CHEMICAL", "Ibuprofen"),
                span("Dosage", "100mg"),
            ],
        );

        let out = reader.read(b"fake image").await.unwrap();
        assert_eq!(out.extracted_drugs, vec!["aspirin", "ibuprofen"]);
        assert_eq!(out.raw_text, "Rx: Aspirin 100mg daily for headache");
    }

    #[tokio::test]
    async fn unknown_drug_spans_are_dropped_as_noise() {
        let reader = reader(
            "take warfarin",
            vec![span("Drug", "warfarin"), span("Drug", "Naproxen")],
        );

        let out = reader.read(b"fake image").await.unwrap();
        // warfarin is drug-tagged but not in the dosage table's key set.
        assert_eq!(out.extracted_drugs, vec!["naproxen"]);
    }

    #[tokio::test]
    async fn duplicate_mentions_collapse() {
        let reader = reader(
            "aspirin ASPIRIN Aspirin",
            vec![
                span("Drug", "aspirin"),
                span("Drug", "ASPIRIN"),
                span("Chemical", "Aspirin"),
            ],
        );

        let out = reader.read(b"fake image").await.unwrap();
        assert_eq!(out.extracted_drugs, vec!["aspirin"]);
    }

    #[tokio::test]
    async fn ocr_failure_propagates_as_typed_error() {
        let reader = PrescriptionReader::new(
            Arc::new(FixedOcr(None)),
            Arc::new(FixedNer(Vec::new())),
            Formulary::builtin().known_drugs(),
        );

        let err = reader.read(b"fake image").await.unwrap_err();
        assert!(matches!(err, ExtractError::EngineUnavailable(_)));
    }
}
