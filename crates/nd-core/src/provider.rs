//! External collaborator contracts.
//!
//! Two boundaries leave this system: the content/search provider an
//! assistant queries per task, and the semantic index used to refine task
//! keywords. Both are traits so the pipeline can run against a real
//! integration, a deterministic fixture, or a mock.

use async_trait::async_trait;

use crate::error::Error;
use crate::article::Article;
use crate::settings::BusinessField;
use crate::task::ResearchTask;

/// The content/search boundary. The one true I/O edge of the pipeline:
/// calls may be slow and may fail transiently, and failures are retryable.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch articles for one research task.
    async fn search(&self, task: &ResearchTask) -> Result<Vec<Article>, Error>;
}

/// The semantic-refinement boundary, backed by a vector database when one
/// is configured. Best-effort: a failure here must never fail the caller's
/// stage, which falls back to the unrefined keyword list.
#[async_trait]
pub trait SemanticIndex: Send + Sync {
    fn name(&self) -> &str;

    /// Expand a base keyword list for a business field.
    async fn refine_keywords(
        &self,
        field: BusinessField,
        base: &[String],
    ) -> Result<Vec<String>, Error>;
}
