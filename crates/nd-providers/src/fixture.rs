//! Deterministic fixture-backed search provider.
//!
//! Stands in for a real search/content API while preserving its contract:
//! asynchronous, may be slow, may fail, returns raw unscored articles. All
//! output is a pure function of the task and the injected clock, so demo
//! runs and tests are reproducible.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use nd_core::{Article, BusinessField, Error, RelevanceScores, ResearchTask, SearchProvider};

/// Per-field publication sources for synthesized articles.
fn sources(field: BusinessField) -> &'static [(&'static str, &'static str)] {
    match field {
        BusinessField::Hpc => &[
            ("HPC Wire", "https://fixture.newsdesk.dev/hpcwire"),
            ("Compute Weekly", "https://fixture.newsdesk.dev/compute-weekly"),
        ],
        BusinessField::Bitcoin => &[
            ("Hashrate Index", "https://fixture.newsdesk.dev/hashrate-index"),
            ("Mining Journal", "https://fixture.newsdesk.dev/mining-journal"),
        ],
        BusinessField::EnergyStorage => &[
            ("Storage Monitor", "https://fixture.newsdesk.dev/storage-monitor"),
            ("Grid Review", "https://fixture.newsdesk.dev/grid-review"),
        ],
    }
}

/// Field-flavored body template; the keyword is spliced in so editorial
/// scoring has real signal to work with.
fn body(field: BusinessField, keyword: &str) -> String {
    match field {
        BusinessField::Hpc => format!(
            "A new {keyword} benchmark pushes processor and supercomputer \
             performance past last year's mark. Vendors report growing demand \
             and fresh investment, while immersion cooling trims energy use \
             and the carbon footprint of flagship clusters."
        ),
        BusinessField::Bitcoin => format!(
            "Operators deploying {keyword} rigs report record hashrate per \
             watt. Analysts see market growth and new partnership deals, with \
             surplus renewable power contracts keeping emission figures flat."
        ),
        BusinessField::EnergyStorage => format!(
            "Utilities piloting {keyword} installations cite improved grid \
             efficiency and falling battery cost. The projects draw investment \
             on the back of renewable integration and carbon targets."
        ),
    }
}

/// A search provider serving synthesized articles.
pub struct FixtureSearchProvider {
    reference_time: DateTime<Utc>,
    timeframe_days: u32,
    unavailable_fields: Vec<BusinessField>,
}

impl FixtureSearchProvider {
    pub fn new(reference_time: DateTime<Utc>, timeframe_days: u32) -> Self {
        Self {
            reference_time,
            timeframe_days: timeframe_days.max(1),
            unavailable_fields: Vec::new(),
        }
    }

    /// Make every search for the given field fail, to exercise the retry
    /// and partial-failure paths.
    pub fn with_unavailable_field(mut self, field: BusinessField) -> Self {
        self.unavailable_fields.push(field);
        self
    }
}

#[async_trait]
impl SearchProvider for FixtureSearchProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn search(&self, task: &ResearchTask) -> Result<Vec<Article>, Error> {
        if self.unavailable_fields.contains(&task.field) {
            return Err(Error::provider(format!(
                "fixture source for {} is unavailable",
                task.field
            )));
        }

        // One article per keyword; a keyword-less task still yields one
        // article seeded from the field vocabulary.
        let keywords: Vec<String> = if task.keywords.is_empty() {
            vec![task.field.seed_vocabulary()[0].to_string()]
        } else {
            task.keywords.clone()
        };

        let window_hours = i64::from(self.timeframe_days) * 24;
        let spacing = window_hours / (keywords.len() as i64 + 1);

        let articles = keywords
            .iter()
            .enumerate()
            .map(|(index, keyword)| {
                let (source, base_url) = sources(task.field)[index % sources(task.field).len()];
                Article {
                    id: format!("{}-{}", task.id, index + 1),
                    title: format!("{} coverage: {}", task.field, keyword),
                    content: body(task.field, keyword),
                    source: source.to_string(),
                    source_url: format!("{}/{}", base_url, index + 1),
                    publication_date: self.reference_time
                        - Duration::hours(spacing * (index as i64 + 1)),
                    image_url: None,
                    scores: RelevanceScores::default(),
                    field: task.field,
                    key_innovations: vec![format!("{keyword} deployment at production scale")],
                    actionable_insights: vec![format!(
                        "Track {keyword} announcements from {source}"
                    )],
                }
            })
            .collect::<Vec<_>>();

        debug!(
            task = %task.id,
            articles = articles.len(),
            "fixture search complete"
        );
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn task(keywords: &[&str]) -> ResearchTask {
        ResearchTask::new(
            "task-hpc",
            BusinessField::Hpc,
            keywords.iter().map(|k| k.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn test_one_article_per_keyword_within_window() {
        let provider = FixtureSearchProvider::new(now(), 7);
        let articles = provider
            .search(&task(&["quantum computing", "exascale"]))
            .await
            .unwrap();

        assert_eq!(articles.len(), 2);
        for article in &articles {
            assert!(article.publication_date < now());
            assert!(article.publication_date > now() - Duration::days(7));
            assert_eq!(article.field, BusinessField::Hpc);
            assert_eq!(article.scores, RelevanceScores::default());
        }
        assert!(articles[0].content.contains("quantum computing"));
    }

    #[tokio::test]
    async fn test_output_is_deterministic() {
        let provider = FixtureSearchProvider::new(now(), 7);
        let first = provider.search(&task(&["quantum computing"])).await.unwrap();
        let second = provider.search(&task(&["quantum computing"])).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_keywordless_task_still_yields_an_article() {
        let provider = FixtureSearchProvider::new(now(), 7);
        let articles = provider.search(&task(&[])).await.unwrap();
        assert_eq!(articles.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_field_errors_retryably() {
        let provider =
            FixtureSearchProvider::new(now(), 7).with_unavailable_field(BusinessField::Hpc);
        let err = provider.search(&task(&["quantum"])).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
