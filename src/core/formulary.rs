use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::models::{
    normalize_name, Alternatives, DosageBand, DosageEntry, DosageRecommendation, Interaction,
};

// ===== Built-in reference tables =====

static BUILTIN: Lazy<Formulary> = Lazy::new(|| {
    let mut interactions = HashMap::new();
    interactions.insert(
        ("aspirin".to_string(), "ibuprofen".to_string()),
        "Increased risk of bleeding".to_string(),
    );
    interactions.insert(
        ("paracetamol".to_string(), "ibuprofen".to_string()),
        "Generally safe".to_string(),
    );

    let mut dosages = HashMap::new();
    for (name, child, adult) in [
        ("aspirin", "50mg", "100mg"),
        ("ibuprofen", "100mg", "200mg"),
        ("paracetamol", "120mg", "500mg"),
        ("acetaminophen", "120mg", "500mg"),
        ("naproxen", "100mg", "250mg"),
    ] {
        dosages.insert(
            name.to_string(),
            DosageEntry {
                child_dose: child.to_string(),
                adult_dose: adult.to_string(),
            },
        );
    }

    let mut alternatives = HashMap::new();
    alternatives.insert(
        "aspirin".to_string(),
        vec!["acetaminophen".to_string(), "naproxen".to_string()],
    );
    alternatives.insert(
        "ibuprofen".to_string(),
        vec!["acetaminophen".to_string(), "naproxen".to_string()],
    );
    alternatives.insert(
        "paracetamol".to_string(),
        vec![
            "aspirin".to_string(),
            "ibuprofen".to_string(),
            "naproxen".to_string(),
        ],
    );

    Formulary::new(interactions, dosages, alternatives)
});

// ===== Formulary =====

/// Drug-knowledge tables and the pure resolvers over them.
///
/// All tables are injected at construction so callers (and tests) own their
/// own instances; nothing here is ambient global state. Every lookup
/// normalizes names first and is total: unknown names yield empty or `None`
/// results, never errors.
#[derive(Debug, Clone)]
pub struct Formulary {
    /// Pairwise interaction warnings keyed by the pair as recorded.
    /// The pair is semantically unordered, so lookups try both orders.
    interactions: HashMap<(String, String), String>,
    dosages: HashMap<String, DosageEntry>,
    alternatives: HashMap<String, Vec<String>>,
}

impl Formulary {
    pub fn new(
        interactions: HashMap<(String, String), String>,
        dosages: HashMap<String, DosageEntry>,
        alternatives: HashMap<String, Vec<String>>,
    ) -> Self {
        Self {
            interactions,
            dosages,
            alternatives,
        }
    }

    /// The built-in reference tables (aspirin, ibuprofen, paracetamol,
    /// acetaminophen, naproxen).
    pub fn builtin() -> Self {
        BUILTIN.clone()
    }

    /// Report known pairwise interactions among the given drugs.
    ///
    /// Every unordered pair (i < j) from the input is looked up in both
    /// orientations; a hit is emitted with the orientation it was recorded
    /// under. Pair generation order (i ascending, then j) makes the output
    /// deterministic for a given input order. Fewer than two inputs simply
    /// yield an empty list.
    pub fn check_interactions(&self, drugs: &[String]) -> Vec<Interaction> {
        let names: Vec<String> = drugs.iter().map(|d| normalize_name(d)).collect();
        let mut found = Vec::new();

        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                let forward = (names[i].clone(), names[j].clone());
                let reverse = (names[j].clone(), names[i].clone());

                if let Some(warning) = self.interactions.get(&forward) {
                    found.push(Interaction {
                        drug_a: forward.0,
                        drug_b: forward.1,
                        warning: warning.clone(),
                    });
                } else if let Some(warning) = self.interactions.get(&reverse) {
                    found.push(Interaction {
                        drug_a: reverse.0,
                        drug_b: reverse.1,
                        warning: warning.clone(),
                    });
                }
            }
        }

        debug!(count = found.len(), "interaction check complete");
        found
    }

    /// Age-banded dosage recommendation, or `None` for an unknown drug.
    pub fn dosage_for(&self, drug: &str, age: i32) -> Option<DosageRecommendation> {
        let name = normalize_name(drug);
        let entry = self.dosages.get(&name)?;
        let band = DosageBand::for_age(age);

        Some(DosageRecommendation {
            drug: name,
            recommended_dosage: entry.dose_for(band).to_string(),
        })
    }

    /// Known substitutes for a drug. A drug with no table entry gets an
    /// empty list, not an error.
    pub fn alternatives_for(&self, drug: &str) -> Alternatives {
        let name = normalize_name(drug);
        let alternatives = self.alternatives.get(&name).cloned().unwrap_or_default();

        Alternatives {
            drug: name,
            alternatives,
        }
    }

    /// The set of drug names the dosage table knows about. The extraction
    /// pipeline uses this to filter NER noise.
    pub fn known_drugs(&self) -> HashSet<String> {
        self.dosages.keys().cloned().collect()
    }
}
