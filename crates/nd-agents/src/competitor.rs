//! Competitor analysis: mines accepted articles for competitor mentions
//! and aggregates them into an intelligence report.

use chrono::{DateTime, Utc};

use nd_core::{
    Article, CompetitorMention, CompetitorReport, CompetitorStats, Error, MarketPosition,
    Sentiment, Settings, Timeframe,
};

/// Mentions kept per competitor in the "most recent" list.
const RECENT_MENTIONS: usize = 5;

/// Characters of context captured on each side of a detected mention.
const CONTEXT_WINDOW: usize = 120;

/// A pure sentiment strategy over a mention's context snippet.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, context: &str) -> Sentiment;
}

/// Default classifier: counts positive and negative lexicon hits in the
/// snippet and takes the majority; balanced counts read as neutral.
pub struct LexiconSentiment;

const POSITIVE_TERMS: &[&str] = &[
    "breakthrough",
    "record",
    "growth",
    "award",
    "success",
    "innovative",
    "gain",
    "partnership",
    "expands",
    "efficient",
    "improved",
    "wins",
];

const NEGATIVE_TERMS: &[&str] = &[
    "lawsuit",
    "decline",
    "loss",
    "outage",
    "recall",
    "failure",
    "bankrupt",
    "layoff",
    "drop",
    "concern",
    "delay",
    "struggles",
];

impl SentimentClassifier for LexiconSentiment {
    fn classify(&self, context: &str) -> Sentiment {
        let lower = context.to_lowercase();
        let positive: usize = POSITIVE_TERMS
            .iter()
            .map(|t| lower.matches(t).count())
            .sum();
        let negative: usize = NEGATIVE_TERMS
            .iter()
            .map(|t| lower.matches(t).count())
            .sum();
        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Sentiment::Positive,
            std::cmp::Ordering::Less => Sentiment::Negative,
            std::cmp::Ordering::Equal => Sentiment::Neutral,
        }
    }
}

/// Result of one analysis pass: raw mentions plus the aggregated report.
#[derive(Debug)]
pub struct CompetitorInsights {
    pub mentions: Vec<CompetitorMention>,
    pub report: CompetitorReport,
}

/// Optional fifth stage of the pipeline. A failure here never fails the
/// workflow; the orchestrator warns and continues without the report.
pub struct CompetitorAnalysisAgent {
    competitors: Vec<String>,
    min_mentions: usize,
    timeframe: Timeframe,
    classifier: Box<dyn SentimentClassifier>,
}

impl CompetitorAnalysisAgent {
    pub fn new(competitors: Vec<String>, min_mentions: usize, timeframe: Timeframe) -> Self {
        Self {
            competitors,
            min_mentions,
            timeframe,
            classifier: Box::new(LexiconSentiment),
        }
    }

    /// The analysis window is the configured trailing number of days before
    /// `reference_time`.
    pub fn from_settings(settings: &Settings, reference_time: DateTime<Utc>) -> Self {
        Self::new(
            settings.competitor_analysis.competitors.clone(),
            settings.competitor_analysis.min_mentions,
            Timeframe::trailing_days(reference_time, settings.timeframe_days),
        )
    }

    pub fn with_classifier(mut self, classifier: Box<dyn SentimentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Scan articles for competitor name mentions and aggregate. Articles
    /// published outside the analysis window are ignored.
    pub fn analyze_articles(&self, articles: &[Article]) -> Result<CompetitorInsights, Error> {
        if self.competitors.is_empty() {
            return Err(Error::competitor_analysis(
                "competitor analysis enabled but no competitors configured",
            ));
        }

        let mut mentions = Vec::new();
        for article in articles {
            if !self.timeframe.contains(article.publication_date) {
                continue;
            }
            for competitor in &self.competitors {
                let Some(position) = find_case_insensitive(&article.content, competitor) else {
                    continue;
                };
                let context = snippet(&article.content, position, competitor.len());
                mentions.push(CompetitorMention {
                    id: format!("mention-{}-{}", slug(competitor), article.id),
                    competitor: competitor.clone(),
                    article_id: article.id.clone(),
                    sentiment: self.classifier.classify(&context),
                    product_comparison: extract_comparison(&context),
                    market_position: classify_position(&context),
                    context,
                    timestamp: article.publication_date,
                });
            }
        }

        let report = self.build_report(&mentions);
        Ok(CompetitorInsights { mentions, report })
    }

    fn build_report(&self, mentions: &[CompetitorMention]) -> CompetitorReport {
        let midpoint = self.timeframe.midpoint();
        let mut competitors = Vec::new();
        let mut emerging = Vec::new();
        let mut declining = Vec::new();

        for competitor in &self.competitors {
            let theirs: Vec<&CompetitorMention> = mentions
                .iter()
                .filter(|m| &m.competitor == competitor)
                .collect();
            // Below the mention threshold the competitor is noise; drop it
            // from the report entirely.
            if theirs.len() < self.min_mentions {
                continue;
            }

            let average_sentiment = if theirs.is_empty() {
                0.0
            } else {
                theirs.iter().map(|m| m.sentiment.signed()).sum::<f64>() / theirs.len() as f64
            };

            let mut recent: Vec<CompetitorMention> =
                theirs.iter().map(|m| (*m).clone()).collect();
            recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            recent.truncate(RECENT_MENTIONS);

            let recent_half = theirs
                .iter()
                .filter(|m| m.timestamp >= midpoint)
                .count();
            let older_half = theirs.len() - recent_half;
            if recent_half > older_half {
                emerging.push(competitor.clone());
            } else if older_half > recent_half {
                declining.push(competitor.clone());
            }

            competitors.push(CompetitorStats {
                competitor: competitor.clone(),
                total_mentions: theirs.len(),
                average_sentiment,
                product_comparisons: theirs
                    .iter()
                    .filter_map(|m| m.product_comparison.clone())
                    .collect(),
                market_position: consolidate_position(&theirs),
                recent_mentions: recent,
            });
        }

        let recommendations = build_recommendations(&competitors);
        CompetitorReport {
            timeframe: self.timeframe,
            competitors,
            recommendations,
            emerging,
            declining,
            generated_at: self.timeframe.end,
        }
    }
}

/// Byte offset of the first case-insensitive occurrence of `needle`.
fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Context window around a match, clamped to char boundaries.
fn snippet(content: &str, start: usize, needle_len: usize) -> String {
    let mut lo = start.saturating_sub(CONTEXT_WINDOW);
    while lo > 0 && !content.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (start + needle_len + CONTEXT_WINDOW).min(content.len());
    while hi < content.len() && !content.is_char_boundary(hi) {
        hi += 1;
    }
    content[lo..hi].trim().to_string()
}

const COMPARISON_CUES: &[&str] = &[
    "better than",
    "worse than",
    "compared to",
    "compared with",
    "versus",
    " vs ",
    "outperforms",
    "cheaper than",
    "faster than",
];

/// Pull out the sentence carrying a comparative phrase, when one appears
/// in the mention context.
fn extract_comparison(context: &str) -> Option<String> {
    for cue in COMPARISON_CUES {
        if let Some(index) = find_case_insensitive(context, cue) {
            let start = context[..index].rfind('.').map(|i| i + 1).unwrap_or(0);
            let end = context[index..]
                .find('.')
                .map(|i| index + i + 1)
                .unwrap_or(context.len());
            return Some(context[start..end].trim().to_string());
        }
    }
    None
}

const LEADER_CUES: &[&str] = &["market leader", "industry leader", "dominant"];
const CHALLENGER_CUES: &[&str] = &["challenger", "rival", "competing with", "catching up"];
const NICHE_CUES: &[&str] = &["niche"];

fn classify_position(context: &str) -> MarketPosition {
    let has = |cues: &[&str]| cues.iter().any(|c| find_case_insensitive(context, c).is_some());
    if has(LEADER_CUES) {
        MarketPosition::Leader
    } else if has(CHALLENGER_CUES) {
        MarketPosition::Challenger
    } else if has(NICHE_CUES) {
        MarketPosition::Niche
    } else {
        MarketPosition::Unknown
    }
}

/// Most frequent classified position across mentions; `Unknown` only when
/// no mention produced a signal.
fn consolidate_position(mentions: &[&CompetitorMention]) -> MarketPosition {
    let mut best = MarketPosition::Unknown;
    let mut best_count = 0;
    for candidate in [
        MarketPosition::Leader,
        MarketPosition::Challenger,
        MarketPosition::Niche,
    ] {
        let count = mentions
            .iter()
            .filter(|m| m.market_position == candidate)
            .count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

fn build_recommendations(stats: &[CompetitorStats]) -> Vec<String> {
    stats
        .iter()
        .map(|s| {
            if s.average_sentiment > 0.3 {
                format!(
                    "Coverage of {} skews positive; expect stronger competitive pressure.",
                    s.competitor
                )
            } else if s.average_sentiment < -0.3 {
                format!(
                    "Coverage of {} skews negative; watch for openings among their customers.",
                    s.competitor
                )
            } else {
                format!("Coverage of {} is mixed; continue monitoring.", s.competitor)
            }
        })
        .collect()
}

fn slug(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use nd_core::testing::{fixed_now, sample_article};
    use nd_core::BusinessField;

    fn window() -> Timeframe {
        Timeframe::trailing_days(fixed_now(), 7)
    }

    fn agent(competitors: &[&str], min_mentions: usize) -> CompetitorAnalysisAgent {
        CompetitorAnalysisAgent::new(
            competitors.iter().map(|c| c.to_string()).collect(),
            min_mentions,
            window(),
        )
    }

    #[test]
    fn test_case_insensitive_mention_detection() {
        let agent = agent(&["AcmeCorp"], 0);
        let article = sample_article(
            "a-1",
            BusinessField::Hpc,
            "Benchmarks put ACMECORP ahead of last year's results.",
        );

        let insights = agent.analyze_articles(&[article]).unwrap();
        assert_eq!(insights.mentions.len(), 1);
        assert_eq!(insights.mentions[0].competitor, "AcmeCorp");
        assert_eq!(insights.mentions[0].article_id, "a-1");
        assert!(insights.mentions[0].context.contains("ACMECORP"));
    }

    #[test]
    fn test_no_mention_outside_timeframe() {
        let agent = agent(&["AcmeCorp"], 0);
        let mut article = sample_article("a-1", BusinessField::Hpc, "AcmeCorp shipped a rig.");
        article.publication_date = fixed_now() - Duration::days(30);

        let insights = agent.analyze_articles(&[article]).unwrap();
        assert!(insights.mentions.is_empty());
    }

    #[test]
    fn test_average_sentiment_arithmetic() {
        let agent = agent(&["AcmeCorp"], 0);

        let mut positive = sample_article(
            "a-1",
            BusinessField::Hpc,
            "AcmeCorp posts record growth and a partnership award.",
        );
        positive.publication_date = fixed_now() - Duration::days(1);
        let mut negative = sample_article(
            "a-2",
            BusinessField::Hpc,
            "AcmeCorp faces a lawsuit after the outage and decline.",
        );
        negative.publication_date = fixed_now() - Duration::days(2);

        let insights = agent
            .analyze_articles(&[positive.clone(), negative])
            .unwrap();
        let stats = &insights.report.competitors[0];
        assert_eq!(stats.total_mentions, 2);
        assert_eq!(stats.average_sentiment, 0.0);

        // Two positives and a neutral average to two thirds.
        let mut neutral = sample_article("a-3", BusinessField::Hpc, "AcmeCorp released a rig.");
        neutral.publication_date = fixed_now() - Duration::days(3);
        let mut positive_b = positive.clone();
        positive_b.id = "a-4".to_string();

        let insights = agent
            .analyze_articles(&[positive, positive_b, neutral])
            .unwrap();
        let stats = &insights.report.competitors[0];
        assert!((stats.average_sentiment - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_mentions_average_is_zero_at_threshold_zero() {
        let agent = agent(&["AcmeCorp"], 0);
        let insights = agent.analyze_articles(&[]).unwrap();
        assert_eq!(insights.report.competitors.len(), 1);
        assert_eq!(insights.report.competitors[0].total_mentions, 0);
        assert_eq!(insights.report.competitors[0].average_sentiment, 0.0);
    }

    #[test]
    fn test_mention_threshold_drops_quiet_competitors() {
        let agent = agent(&["AcmeCorp", "BoltEnergy"], 2);
        let article_a = sample_article("a-1", BusinessField::Hpc, "AcmeCorp and BoltEnergy demo.");
        let article_b = sample_article("a-2", BusinessField::Hpc, "AcmeCorp follow-up coverage.");

        let insights = agent.analyze_articles(&[article_a, article_b]).unwrap();
        // BoltEnergy has one mention, below the threshold of two.
        assert_eq!(insights.report.competitors.len(), 1);
        assert_eq!(insights.report.competitors[0].competitor, "AcmeCorp");
        // The raw mention list still carries both.
        assert_eq!(insights.mentions.len(), 3);
    }

    #[test]
    fn test_recent_mentions_sorted_newest_first_and_capped() {
        let agent = agent(&["AcmeCorp"], 0);
        let articles: Vec<_> = (0..7i64)
            .map(|i| {
                let mut a = sample_article(
                    &format!("a-{i}"),
                    BusinessField::Hpc,
                    "AcmeCorp status update.",
                );
                a.publication_date = fixed_now() - Duration::hours(i);
                a
            })
            .collect();

        let insights = agent.analyze_articles(&articles).unwrap();
        let recent = &insights.report.competitors[0].recent_mentions;
        assert_eq!(recent.len(), 5);
        for pair in recent.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
        assert_eq!(recent[0].article_id, "a-0");
    }

    #[test]
    fn test_product_comparison_and_market_position() {
        let agent = agent(&["AcmeCorp"], 0);
        let article = sample_article(
            "a-1",
            BusinessField::Hpc,
            "The new rig is faster than AcmeCorp's flagship. Analysts call AcmeCorp the market leader regardless.",
        );

        let insights = agent.analyze_articles(&[article]).unwrap();
        let mention = &insights.mentions[0];
        assert!(mention.product_comparison.as_deref().unwrap().contains("faster than"));
        assert_eq!(mention.market_position, MarketPosition::Leader);
        assert_eq!(
            insights.report.competitors[0].market_position,
            MarketPosition::Leader
        );
    }

    #[test]
    fn test_trend_buckets_split_on_window_midpoint() {
        let agent = agent(&["AcmeCorp", "BoltEnergy"], 0);
        let mut articles = Vec::new();
        // AcmeCorp: both mentions in the recent half.
        for i in 0..2i64 {
            let mut a = sample_article(
                &format!("recent-{i}"),
                BusinessField::Hpc,
                "AcmeCorp update.",
            );
            a.publication_date = fixed_now() - Duration::hours(i + 1);
            articles.push(a);
        }
        // BoltEnergy: both mentions in the older half.
        for i in 0..2i64 {
            let mut a = sample_article(
                &format!("old-{i}"),
                BusinessField::Hpc,
                "BoltEnergy update.",
            );
            a.publication_date = fixed_now() - Duration::days(6) + Duration::hours(i);
            articles.push(a);
        }

        let insights = agent.analyze_articles(&articles).unwrap();
        assert_eq!(insights.report.emerging, vec!["AcmeCorp".to_string()]);
        assert_eq!(insights.report.declining, vec!["BoltEnergy".to_string()]);
    }

    #[test]
    fn test_empty_competitor_list_is_an_error() {
        let agent = agent(&[], 0);
        let err = agent.analyze_articles(&[]).unwrap_err();
        assert!(matches!(err, Error::CompetitorAnalysis(_)));
    }

    #[test]
    fn test_lexicon_sentiment_majority() {
        let classifier = LexiconSentiment;
        assert_eq!(
            classifier.classify("record growth and an award"),
            Sentiment::Positive
        );
        assert_eq!(
            classifier.classify("lawsuit follows the outage"),
            Sentiment::Negative
        );
        assert_eq!(classifier.classify("quarterly report published"), Sentiment::Neutral);
        assert_eq!(
            classifier.classify("growth stalls amid a lawsuit and a layoff"),
            Sentiment::Negative
        );
    }
}
