//! Query-side ephemeral types: the analyzed plan and the assembled
//! retrieval context that feeds the generator.

use crate::vector::{MetadataFilter, VectorEntry};
use serde::{Deserialize, Serialize};

/// The closed set of recognized query intents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    PatientInfo,
    ConditionList,
    SymptomSearch,
    MedicationInfo,
    TemporalQuery,
    GeneralQuery,
    Unknown,
}

impl Default for Intent {
    fn default() -> Self {
        Intent::Unknown
    }
}

/// Entities recognized in a normalized query, grouped by type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entities {
    #[serde(default)]
    pub patients: Vec<String>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub dates: Vec<String>,
}

impl Entities {
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
        && self.conditions.is_empty()
        && self.symptoms.is_empty()
        && self.medications.is_empty()
        && self.dates.is_empty()
    }

    /// Total entity count, used by the confidence and ranker formulas.
    pub fn total(&self) -> usize {
        self.patients.len() + self.conditions.len() + self.symptoms.len() + self.medications.len() + self.dates.len()
    }
}

/// The result of analyzing a raw natural-language query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryPlan {
    pub raw_query: String,
    pub normalized: String,
    pub intent: Intent,
    pub entities: Entities,
    #[serde(default)]
    pub filters: Vec<MetadataFilter>,
    #[serde(default)]
    pub search_terms: Vec<String>,
}

/// One ranked context item, ready to be folded into a generation prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedContext {
    pub entry: VectorEntry,
    pub similarity: f32,
    /// Sum of ranker bonuses applied on top of `similarity`.
    pub bonuses: f32,
    pub final_score: f32,
    pub excerpt: String,
}

/// An ordered, ranked retrieval result plus aggregate stats, passed to
/// the RAG generator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RagContext {
    pub items: Vec<RankedContext>,
}

impl RagContext {
    pub fn mean_similarity(&self) -> f32 {
        if self.items.is_empty() {
            return 0.0;
        }
        self.items.iter().map(|i| i.similarity).sum::<f32>() / self.items.len() as f32
    }

    pub fn source_count(&self) -> usize {
        self.items.len()
    }
}

/// The `Chat` operation's result: the validated answer plus
/// the supporting evidence a caller can choose to surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResult {
    pub answer: String,
    pub confidence: f32,
    pub intent: Intent,
    #[serde(default)]
    pub follow_up: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<Vec<RankedContext>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_empty_by_default() {
        let e = Entities::default();
        assert!(e.is_empty());
    }

    #[test]
    fn mean_similarity_empty_is_zero() {
        let ctx = RagContext::default();
        assert_eq!(ctx.mean_similarity(), 0.0);
    }
}
