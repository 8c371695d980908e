//! The settings aggregate consumed by the agent workflow.
//!
//! Settings are resolved by the caller (the CLI loads them from a TOML
//! file) and handed to the orchestrator as a single read-only value.
//! Nothing in the pipeline fetches or persists settings itself.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Industry vertical used to scope research and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessField {
    Hpc,
    Bitcoin,
    EnergyStorage,
}

impl BusinessField {
    pub const ALL: [BusinessField; 3] =
        [Self::Hpc, Self::Bitcoin, Self::EnergyStorage];

    /// Stable identifier, used in task and article ids.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Hpc => "hpc",
            Self::Bitcoin => "bitcoin",
            Self::EnergyStorage => "energy-storage",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Hpc => "High-Performance Computing",
            Self::Bitcoin => "Bitcoin Mining",
            Self::EnergyStorage => "Energy Storage",
        }
    }

    /// The seed vocabulary a global keyword must touch (case-insensitive
    /// substring, either direction) to be considered relevant to this field.
    pub fn seed_vocabulary(&self) -> &'static [&'static str] {
        match self {
            Self::Hpc => &[
                "computing",
                "supercomputer",
                "processor",
                "quantum",
                "performance",
            ],
            Self::Bitcoin => &["mining", "cryptocurrency", "blockchain", "hash", "power"],
            Self::EnergyStorage => &["battery", "renewable", "grid", "storage", "efficiency"],
        }
    }
}

impl std::fmt::Display for BusinessField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A company branch, tagged with the vertical it operates in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyBranch {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub field: BusinessField,
}

/// Prompt templates handed to downstream consumers of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplates {
    #[serde(default = "default_research_prompt")]
    pub research: String,
    #[serde(default = "default_editorial_prompt")]
    pub editorial: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            research: default_research_prompt(),
            editorial: default_editorial_prompt(),
        }
    }
}

fn default_research_prompt() -> String {
    "Find recent developments relevant to the given business field and keywords.".to_string()
}

fn default_editorial_prompt() -> String {
    "Summarize accepted articles per business field, leading with actionable insights."
        .to_string()
}

/// Which source categories research may draw from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceToggles {
    #[serde(default = "default_true")]
    pub news_apis: bool,
    #[serde(default = "default_true")]
    pub rss_feeds: bool,
    #[serde(default)]
    pub websites: bool,
}

impl Default for SourceToggles {
    fn default() -> Self {
        Self {
            news_apis: true,
            rss_feeds: true,
            websites: false,
        }
    }
}

/// Per-dimension relevance weights. Each weight lives in [0, 1]; the set
/// is expected to sum to roughly 1 but that is not enforced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RelevanceWeights {
    pub technical: f64,
    pub business: f64,
    pub sustainability: f64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            technical: 0.4,
            business: 0.35,
            sustainability: 0.25,
        }
    }
}

/// Ordering applied to research tasks before batching.
///
/// Each mode is a documented total order (stable, task id as tie-break):
/// - `depth`: keyword count descending, the keyword-heaviest tasks first
/// - `breadth`: keyword count ascending, the cheapest scans first
/// - `balanced`: round-robin interleave across business fields, so every
///   batch mixes fields where possible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    #[default]
    Balanced,
    Depth,
    Breadth,
}

/// Execution knobs for the research stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchSettings {
    /// Batch size ceiling for parallel task execution.
    #[serde(default = "default_max_parallel")]
    pub max_parallel_tasks: usize,
    #[serde(default)]
    pub task_priority: TaskPriority,
    /// Number of assistant workers in the pool.
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Retry failed provider calls up to the fixed bound.
    #[serde(default = "default_true")]
    pub auto_retry: bool,
    /// Per-task deadline for one provider call; a timeout counts as a
    /// retryable failure.
    #[serde(default = "default_task_timeout")]
    pub task_timeout_secs: u64,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            max_parallel_tasks: default_max_parallel(),
            task_priority: TaskPriority::default(),
            pool_size: default_pool_size(),
            auto_retry: true,
            task_timeout_secs: default_task_timeout(),
        }
    }
}

fn default_max_parallel() -> usize {
    3
}

fn default_pool_size() -> usize {
    3
}

fn default_task_timeout() -> u64 {
    30
}

/// Competitor-analysis sub-config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub competitors: Vec<String>,
    #[serde(default = "default_update_frequency")]
    pub update_frequency_hours: u32,
    /// Competitors with fewer mentions than this are dropped from the report.
    #[serde(default = "default_min_mentions")]
    pub min_mentions: usize,
    #[serde(default)]
    pub auto_reports: bool,
}

impl Default for CompetitorSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            competitors: Vec::new(),
            update_frequency_hours: default_update_frequency(),
            min_mentions: default_min_mentions(),
            auto_reports: false,
        }
    }
}

fn default_update_frequency() -> u32 {
    24
}

fn default_min_mentions() -> usize {
    3
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorProvider {
    Pinecone,
    #[default]
    Qdrant,
    Chroma,
}

/// Vector-database sub-config for semantic keyword refinement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub provider: VectorProvider,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,
}

impl Default for VectorSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: VectorProvider::default(),
            dimension: default_dimension(),
            top_k: default_top_k(),
            min_similarity: default_min_similarity(),
        }
    }
}

fn default_dimension() -> usize {
    768
}

fn default_top_k() -> usize {
    10
}

fn default_min_similarity() -> f64 {
    0.7
}

fn default_true() -> bool {
    true
}

fn default_timeframe_days() -> u32 {
    7
}

fn default_minimum_score() -> f64 {
    3.5
}

/// The full configuration aggregate. Immutable for the duration of one
/// workflow run; the orchestrator snapshots it at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub prompts: PromptTemplates,
    #[serde(default)]
    pub branches: Vec<CompanyBranch>,
    #[serde(default)]
    pub keywords: Vec<String>,
    /// How far back research looks, in days.
    #[serde(default = "default_timeframe_days")]
    pub timeframe_days: u32,
    #[serde(default)]
    pub sources: SourceToggles,
    #[serde(default)]
    pub weights: RelevanceWeights,
    /// Hard acceptance cutoff on the overall relevance score.
    #[serde(default = "default_minimum_score")]
    pub minimum_score: f64,
    #[serde(default)]
    pub priority_keywords: Vec<String>,
    #[serde(default)]
    pub exclusion_keywords: Vec<String>,
    #[serde(default)]
    pub research: ResearchSettings,
    #[serde(default)]
    pub competitor_analysis: CompetitorSettings,
    #[serde(default)]
    pub vector_database: VectorSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompts: PromptTemplates::default(),
            branches: Vec::new(),
            keywords: Vec::new(),
            timeframe_days: default_timeframe_days(),
            sources: SourceToggles::default(),
            weights: RelevanceWeights::default(),
            minimum_score: default_minimum_score(),
            priority_keywords: Vec::new(),
            exclusion_keywords: Vec::new(),
            research: ResearchSettings::default(),
            competitor_analysis: CompetitorSettings::default(),
            vector_database: VectorSettings::default(),
        }
    }
}

impl Settings {
    /// Distinct business fields present in the branch list, in order of
    /// first appearance.
    pub fn business_fields(&self) -> Vec<BusinessField> {
        let mut fields = Vec::new();
        for branch in &self.branches {
            if !fields.contains(&branch.field) {
                fields.push(branch.field);
            }
        }
        fields
    }

    /// Structural validation of ranges the rest of the pipeline assumes.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, w) in [
            ("technical", self.weights.technical),
            ("business", self.weights.business),
            ("sustainability", self.weights.sustainability),
        ] {
            if !(0.0..=1.0).contains(&w) {
                return Err(Error::config(format!(
                    "relevance weight '{name}' must be within [0, 1], got {w}"
                )));
            }
        }
        if !(0.0..=5.0).contains(&self.minimum_score) {
            return Err(Error::config(format!(
                "minimum_score must be within [0, 5], got {}",
                self.minimum_score
            )));
        }
        if self.research.max_parallel_tasks == 0 {
            return Err(Error::config("research.max_parallel_tasks must be positive"));
        }
        if self.research.pool_size == 0 {
            return Err(Error::config("research.pool_size must be positive"));
        }
        if self.timeframe_days == 0 {
            return Err(Error::config("timeframe_days must be positive"));
        }
        Ok(())
    }
}
