//! nd-core: Core types and traits for newsdesk
//!
//! This crate provides the foundational types and traits used throughout
//! the newsdesk curation pipeline: the settings aggregate, research tasks
//! and articles, report types, the error taxonomy, and the external
//! provider contracts.

pub mod article;
pub mod error;
pub mod provider;
pub mod report;
pub mod settings;
pub mod task;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use article::{Article, RelevanceScores};
pub use error::Error;
pub use provider::{SearchProvider, SemanticIndex};
pub use report::{
    CompetitorMention, CompetitorReport, CompetitorStats, CuratedReport, FieldSection,
    MarketPosition, Sentiment, Timeframe,
};
pub use settings::{
    BusinessField, CompanyBranch, CompetitorSettings, PromptTemplates, RelevanceWeights,
    ResearchSettings, Settings, SourceToggles, TaskPriority, VectorProvider, VectorSettings,
};
pub use task::{ResearchTask, TaskStatus};

pub type Result<T> = std::result::Result<T, Error>;
