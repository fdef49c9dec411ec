//! Retrieval and ranking tunables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub default_max_results: usize,
    /// Minimum cosine similarity for the default (`GeneralQuery`) strategy.
    pub default_min_score: f32,
    /// Fuzzy patient-name match threshold.
    pub fuzzy_name_threshold: f32,
    /// Fuzzy match threshold for linking a Document to an existing
    /// Recording by patient name.
    pub document_link_threshold: f32,
    pub ranker: RankerWeights,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_max_results: 5,
            default_min_score: 0.6,
            fuzzy_name_threshold: 0.55,
            document_link_threshold: 0.85,
            ranker: RankerWeights::default(),
        }
    }
}

/// Additive bonus weights for the ranker formula.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankerWeights {
    pub patient_hit: f32,
    pub condition_hit: f32,
    pub symptom_hit: f32,
    pub recency: f32,
}

impl Default for RankerWeights {
    fn default() -> Self {
        Self { patient_hit: 0.10, condition_hit: 0.15, symptom_hit: 0.05, recency: 0.02 }
    }
}
