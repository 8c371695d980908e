//! Editor: scores every collected article on three weighted dimensions,
//! filters below the acceptance threshold, and compiles the final report.

use chrono::Utc;

use nd_core::{
    Article, BusinessField, CuratedReport, Error, FieldSection, RelevanceScores,
    RelevanceWeights, Settings,
};

/// Insights surfaced per field section in the compiled report.
const TOP_INSIGHTS: usize = 5;

/// A pure scoring strategy for one relevance dimension. Implementations
/// must be deterministic: the same article always gets the same score.
pub trait DimensionScorer: Send + Sync {
    /// Rate an article on this dimension, in [0, 5].
    fn score(&self, article: &Article) -> f64;
}

/// Default scoring heuristic: vocabulary density over the article text,
/// boosted by priority keywords and penalized by exclusion keywords.
pub struct KeywordDensityScorer {
    vocabulary: Vec<String>,
    priority: Vec<String>,
    exclusions: Vec<String>,
}

impl KeywordDensityScorer {
    pub fn new<I, S>(vocabulary: I, priority: &[String], exclusions: &[String]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            vocabulary: vocabulary
                .into_iter()
                .map(|term| term.as_ref().to_lowercase())
                .collect(),
            priority: priority.iter().map(|term| term.to_lowercase()).collect(),
            exclusions: exclusions.iter().map(|term| term.to_lowercase()).collect(),
        }
    }
}

impl DimensionScorer for KeywordDensityScorer {
    fn score(&self, article: &Article) -> f64 {
        let text = format!("{} {}", article.title, article.content).to_lowercase();
        let words = text.split_whitespace().count().max(1);

        let hits: usize = self
            .vocabulary
            .iter()
            .map(|term| text.matches(term.as_str()).count())
            .sum();

        // Saturating curve over hits-per-100-words: 0 hits scores 0, heavy
        // coverage approaches 5 without ever exceeding it.
        let density = hits as f64 * 100.0 / words as f64;
        let mut score = 5.0 * density / (density + 5.0);

        for term in &self.priority {
            if text.contains(term.as_str()) {
                score += 0.5;
            }
        }
        for term in &self.exclusions {
            if text.contains(term.as_str()) {
                score -= 1.0;
            }
        }
        score.clamp(0.0, 5.0)
    }
}

/// Built-in vocabulary for the technical dimension.
const TECHNICAL_TERMS: &[&str] = &[
    "quantum",
    "processor",
    "supercomputer",
    "chip",
    "architecture",
    "cooling",
    "hardware",
    "asic",
    "exascale",
    "hashrate",
    "battery",
    "electrolyte",
    "inverter",
    "benchmark",
];

/// Built-in vocabulary for the business dimension.
const BUSINESS_TERMS: &[&str] = &[
    "market",
    "revenue",
    "investment",
    "partnership",
    "acquisition",
    "contract",
    "customer",
    "demand",
    "cost",
    "growth",
    "funding",
    "pricing",
];

/// Built-in vocabulary for the sustainability dimension.
const SUSTAINABILITY_TERMS: &[&str] = &[
    "renewable",
    "carbon",
    "emission",
    "sustainab",
    "green",
    "solar",
    "wind",
    "hydro",
    "recycl",
    "climate",
    "efficiency",
];

/// The editorial outcome: accepted (re-scored) articles plus the compiled
/// narrative.
pub struct EditorialOutcome {
    pub articles: Vec<Article>,
    pub report: CuratedReport,
}

/// Fourth stage of the pipeline.
pub struct EditorAgent {
    weights: RelevanceWeights,
    minimum_score: f64,
    technical: Box<dyn DimensionScorer>,
    business: Box<dyn DimensionScorer>,
    sustainability: Box<dyn DimensionScorer>,
}

impl EditorAgent {
    /// Build the editor with the default keyword-density scorers, wiring
    /// in the configured priority and exclusion keyword lists.
    pub fn from_settings(settings: &Settings) -> Self {
        let priority = &settings.priority_keywords;
        let exclusions = &settings.exclusion_keywords;
        Self {
            weights: settings.weights,
            minimum_score: settings.minimum_score,
            technical: Box::new(KeywordDensityScorer::new(
                TECHNICAL_TERMS.iter().copied(),
                priority,
                exclusions,
            )),
            business: Box::new(KeywordDensityScorer::new(
                BUSINESS_TERMS.iter().copied(),
                priority,
                exclusions,
            )),
            sustainability: Box::new(KeywordDensityScorer::new(
                SUSTAINABILITY_TERMS.iter().copied(),
                priority,
                exclusions,
            )),
        }
    }

    /// Build the editor with injected scoring strategies.
    pub fn with_scorers(
        weights: RelevanceWeights,
        minimum_score: f64,
        technical: Box<dyn DimensionScorer>,
        business: Box<dyn DimensionScorer>,
        sustainability: Box<dyn DimensionScorer>,
    ) -> Self {
        Self {
            weights,
            minimum_score,
            technical,
            business,
            sustainability,
        }
    }

    /// Score every article, keep the ones whose weighted overall score
    /// clears the minimum, and compile the report from the survivors.
    /// Incoming articles are never mutated; scored copies are emitted.
    pub fn compile_report(&self, articles: &[Article]) -> Result<EditorialOutcome, Error> {
        let mut accepted = Vec::new();
        for article in articles {
            let technical = self.technical.score(article);
            let business = self.business.score(article);
            let sustainability = self.sustainability.score(article);
            let overall = technical * self.weights.technical
                + business * self.weights.business
                + sustainability * self.weights.sustainability;
            if !overall.is_finite() {
                return Err(Error::editorial(format!(
                    "non-finite overall score for article '{}'",
                    article.id
                )));
            }
            if overall >= self.minimum_score {
                accepted.push(article.clone().with_scores(RelevanceScores {
                    technical,
                    business,
                    sustainability,
                    overall,
                }));
            }
        }

        let report = build_report(&accepted);
        Ok(EditorialOutcome {
            articles: accepted,
            report,
        })
    }
}

/// Group accepted articles by business field (first-seen order), one
/// section per field with a summary paragraph and the top insights drawn
/// from the highest-scoring articles.
fn build_report(accepted: &[Article]) -> CuratedReport {
    let mut field_order: Vec<BusinessField> = Vec::new();
    for article in accepted {
        if !field_order.contains(&article.field) {
            field_order.push(article.field);
        }
    }

    let sections = field_order
        .into_iter()
        .map(|field| {
            let mut group: Vec<&Article> =
                accepted.iter().filter(|a| a.field == field).collect();
            group.sort_by(|a, b| {
                b.scores
                    .overall
                    .partial_cmp(&a.scores.overall)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let leading: Vec<&str> = group
                .iter()
                .take(3)
                .map(|a| a.title.as_str())
                .collect();
            let summary = format!(
                "{} article(s) accepted for {}. Leading coverage: {}.",
                group.len(),
                field,
                leading.join("; ")
            );

            let mut top_insights = Vec::new();
            for article in &group {
                for insight in &article.actionable_insights {
                    if top_insights.len() == TOP_INSIGHTS {
                        break;
                    }
                    if !top_insights.contains(insight) {
                        top_insights.push(insight.clone());
                    }
                }
            }

            FieldSection {
                field,
                article_count: group.len(),
                summary,
                top_insights,
            }
        })
        .collect();

    CuratedReport {
        generated_at: Utc::now(),
        article_count: accepted.len(),
        sections,
    }
}
