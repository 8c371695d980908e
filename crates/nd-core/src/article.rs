//! Articles and their relevance scores.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::BusinessField;

/// Per-dimension relevance ratings plus the weighted overall score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RelevanceScores {
    pub technical: f64,
    pub business: f64,
    pub sustainability: f64,
    pub overall: f64,
}

/// A collected news article.
///
/// Articles pass through the pipeline by value. Stages that change a field
/// emit a new value (`with_scores`) rather than mutating a shared one, which
/// keeps batch-level parallelism free of aliasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    pub source: String,
    pub source_url: String,
    pub publication_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub scores: RelevanceScores,
    pub field: BusinessField,
    #[serde(default)]
    pub key_innovations: Vec<String>,
    #[serde(default)]
    pub actionable_insights: Vec<String>,
}

impl Article {
    /// Return a copy of this article with the given scores attached.
    pub fn with_scores(mut self, scores: RelevanceScores) -> Self {
        self.scores = scores;
        self
    }
}
