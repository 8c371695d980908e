//! Research leader: converts global settings into one scoped research task
//! per business field.

use std::sync::Arc;

use tracing::{debug, warn};

use nd_core::{BusinessField, Error, ResearchTask, SemanticIndex, Settings};

/// First stage of the pipeline. Owns the field-scoping rules: which global
/// keywords belong to which business field, and whether the base list gets
/// a best-effort semantic expansion.
pub struct ResearchLeaderAgent {
    settings: Arc<Settings>,
    semantic_index: Option<Arc<dyn SemanticIndex>>,
}

impl ResearchLeaderAgent {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            semantic_index: None,
        }
    }

    /// Attach a semantic index for keyword refinement. Only consulted when
    /// the vector sub-config is enabled.
    pub fn with_semantic_index(mut self, index: Arc<dyn SemanticIndex>) -> Self {
        self.semantic_index = Some(index);
        self
    }

    /// Emit one pending research task per distinct business field present
    /// in the configured company branches, in order of first appearance.
    pub async fn establish_scope(&self) -> Result<Vec<ResearchTask>, Error> {
        if self.settings.branches.is_empty() {
            return Err(Error::scope("no company branches configured"));
        }

        let fields = self.settings.business_fields();
        let mut tasks = Vec::with_capacity(fields.len());
        for field in fields {
            let base = field_keywords(field, &self.settings.keywords);
            let keywords = if self.settings.vector_database.enabled {
                self.refine(field, base).await
            } else {
                base
            };
            tasks.push(ResearchTask::new(
                format!("task-{}", field.slug()),
                field,
                keywords,
            ));
        }

        debug!(tasks = tasks.len(), "research scope established");
        Ok(tasks)
    }

    /// Semantic refinement is an enhancement, never a hard dependency: any
    /// failure (or a missing index) falls back to the base list.
    async fn refine(&self, field: BusinessField, base: Vec<String>) -> Vec<String> {
        let Some(index) = &self.semantic_index else {
            return base;
        };
        match index.refine_keywords(field, &base).await {
            Ok(refined) if !refined.is_empty() => refined,
            Ok(_) => base,
            Err(err) => {
                warn!(
                    field = %field,
                    index = index.name(),
                    error = %err,
                    "semantic refinement failed; using base keywords"
                );
                base
            }
        }
    }
}

/// Filter the global keyword list down to the ones relevant to a field:
/// a keyword qualifies when it touches the field's seed vocabulary by
/// case-insensitive substring match, in either direction.
fn field_keywords(field: BusinessField, global: &[String]) -> Vec<String> {
    global
        .iter()
        .filter(|keyword| {
            let lower = keyword.to_lowercase();
            field
                .seed_vocabulary()
                .iter()
                .any(|seed| lower.contains(seed) || seed.contains(lower.as_str()))
        })
        .cloned()
        .collect()
}
