use serde::{Deserialize, Serialize};

/// Normalize a drug name for lookup or storage.
///
/// Every table in this crate is keyed by the lower-cased, trimmed name.
/// Empty and unknown names are valid inputs; they simply match nothing.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Age band used to select a recommended dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DosageBand {
    Child,
    Adult,
}

impl DosageBand {
    /// Band for a patient age in years. Anything below 18 is Child,
    /// including negative ages (age is not bounds-checked upstream).
    pub fn for_age(age: i32) -> Self {
        if age < 18 {
            DosageBand::Child
        } else {
            DosageBand::Adult
        }
    }
}

/// Recommended doses for one drug, as opaque display strings (e.g., "100mg").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DosageEntry {
    pub child_dose: String,
    pub adult_dose: String,
}

impl DosageEntry {
    pub fn dose_for(&self, band: DosageBand) -> &str {
        match band {
            DosageBand::Child => &self.child_dose,
            DosageBand::Adult => &self.adult_dose,
        }
    }
}

/// A resolved dosage recommendation for one drug and patient age.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DosageRecommendation {
    pub drug: String,
    pub recommended_dosage: String,
}

/// A known pairwise interaction warning. The pair is semantically
/// unordered; `drug_a`/`drug_b` reflect the order the fact was recorded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub drug_a: String,
    pub drug_b: String,
    pub warning: String,
}

/// Substitute candidates for one drug. An empty list means no known
/// alternatives, which is a normal answer rather than an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alternatives {
    pub drug: String,
    pub alternatives: Vec<String>,
}

/// Descriptive record for one medicine. All fields are free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineRecord {
    pub name: String,
    pub description: String,
    pub uses: String,
    pub side_effects: String,
}
