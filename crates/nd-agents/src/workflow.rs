//! The workflow orchestrator: wires the pipeline stages together and
//! assembles the final result.
//!
//! Error tiers:
//! - scope, planning and editorial failures abort the whole run
//! - a research task failure is isolated; its articles are simply absent
//! - competitor analysis is an enhancement; its failure is logged and the
//!   run still succeeds without it

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use nd_core::{Article, CuratedReport, Error, SearchProvider, SemanticIndex, Settings};

use crate::assistant::AssistantPool;
use crate::competitor::{CompetitorAnalysisAgent, CompetitorInsights};
use crate::editor::EditorAgent;
use crate::leader::ResearchLeaderAgent;
use crate::planner::ProjectPlannerAgent;

/// The workflow result handed back to the caller.
#[derive(Debug)]
pub struct WorkflowReport {
    pub articles: Vec<Article>,
    pub report: CuratedReport,
    /// Present only when competitor analysis is enabled and succeeded.
    pub competitor_analysis: Option<CompetitorInsights>,
    /// Ids of research tasks that failed past their retry bound.
    pub failed_tasks: Vec<String>,
}

/// The orchestrator over one pipeline: scope → plan → research → edit →
/// competitor analysis.
pub struct AgentWorkflow {
    settings: Arc<Settings>,
    leader: ResearchLeaderAgent,
    planner: ProjectPlannerAgent,
    pool: AssistantPool,
    editor: EditorAgent,
    reference_time: Option<DateTime<Utc>>,
}

impl AgentWorkflow {
    /// Build a workflow over an owned settings snapshot. The settings are
    /// immutable for the lifetime of the workflow.
    pub fn new(settings: Settings, provider: Arc<dyn SearchProvider>) -> Self {
        let settings = Arc::new(settings);
        Self {
            leader: ResearchLeaderAgent::new(Arc::clone(&settings)),
            planner: ProjectPlannerAgent::from_settings(&settings),
            pool: AssistantPool::new(provider, &settings.research),
            editor: EditorAgent::from_settings(&settings),
            settings,
            reference_time: None,
        }
    }

    /// Attach a semantic index for keyword refinement.
    pub fn with_semantic_index(mut self, index: Arc<dyn SemanticIndex>) -> Self {
        self.leader = self.leader.with_semantic_index(index);
        self
    }

    /// Pin the instant the analysis window is anchored to. Defaults to the
    /// wall clock at execution time.
    pub fn with_reference_time(mut self, instant: DateTime<Utc>) -> Self {
        self.reference_time = Some(instant);
        self
    }

    /// Run the pipeline once.
    pub async fn execute(&self) -> Result<WorkflowReport, Error> {
        info!("starting curation workflow");

        let tasks = self.leader.establish_scope().await?;
        info!(tasks = tasks.len(), "scope established");

        let batches = self.planner.plan_research(tasks)?;
        info!(batches = batches.len(), "research plan ready");

        let mut articles = Vec::new();
        let mut failed_tasks = Vec::new();
        for (index, batch) in batches.into_iter().enumerate() {
            debug!(batch = index, size = batch.len(), "dispatching batch");
            for outcome in self.pool.run_batch(batch).await {
                match outcome.error {
                    None => articles.extend(outcome.task.results),
                    Some(err) => {
                        warn!(
                            task = %outcome.task.id,
                            error = %err,
                            "dropping failed research task"
                        );
                        failed_tasks.push(outcome.task.id);
                    }
                }
            }
        }
        info!(
            articles = articles.len(),
            failed_tasks = failed_tasks.len(),
            "research complete"
        );

        let editorial = self.editor.compile_report(&articles)?;
        info!(accepted = editorial.articles.len(), "editorial review complete");

        let competitor_analysis = if self.settings.competitor_analysis.enabled {
            let reference = self.reference_time.unwrap_or_else(Utc::now);
            let agent = CompetitorAnalysisAgent::from_settings(&self.settings, reference);
            match agent.analyze_articles(&editorial.articles) {
                Ok(insights) => {
                    info!(
                        mentions = insights.mentions.len(),
                        "competitor analysis complete"
                    );
                    Some(insights)
                }
                Err(err) => {
                    warn!(error = %err, "competitor analysis failed; continuing without it");
                    None
                }
            }
        } else {
            None
        };

        Ok(WorkflowReport {
            articles: editorial.articles,
            report: editorial.report,
            competitor_analysis,
            failed_tasks,
        })
    }
}
