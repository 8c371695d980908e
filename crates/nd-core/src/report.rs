//! Compiled report types: the curated editorial report and the competitor
//! intelligence report.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::BusinessField;

/// One business-field section of the curated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSection {
    pub field: BusinessField,
    pub article_count: usize,
    pub summary: String,
    pub top_insights: Vec<String>,
}

/// The compiled narrative over all accepted articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CuratedReport {
    pub generated_at: DateTime<Utc>,
    pub article_count: usize,
    pub sections: Vec<FieldSection>,
}

impl CuratedReport {
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "# Curated news report\n\n{} accepted article(s), generated {}\n",
            self.article_count,
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));
        for section in &self.sections {
            out.push_str(&format!(
                "\n## {} ({} article(s))\n\n{}\n",
                section.field, section.article_count, section.summary
            ));
            if !section.top_insights.is_empty() {
                out.push_str("\nKey insights:\n");
                for insight in &section.top_insights {
                    out.push_str(&format!("- {insight}\n"));
                }
            }
        }
        out
    }
}

/// Sentiment of a competitor mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Signed scalar mapping used for averaging: +1 / 0 / −1.
    pub fn signed(self) -> f64 {
        match self {
            Sentiment::Positive => 1.0,
            Sentiment::Neutral => 0.0,
            Sentiment::Negative => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    Leader,
    Challenger,
    Niche,
    #[default]
    Unknown,
}

impl std::fmt::Display for MarketPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MarketPosition::Leader => "leader",
            MarketPosition::Challenger => "challenger",
            MarketPosition::Niche => "niche",
            MarketPosition::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// A detected reference to a tracked competitor within an accepted article.
///
/// The timestamp is the source article's publication date, so mention
/// ordering stays chronological and re-analysis is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorMention {
    pub id: String,
    pub competitor: String,
    pub article_id: String,
    pub sentiment: Sentiment,
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_comparison: Option<String>,
    pub market_position: MarketPosition,
    pub timestamp: DateTime<Utc>,
}

/// A closed time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeframe {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Timeframe {
    /// The window covering the `days` before `end`.
    pub fn trailing_days(end: DateTime<Utc>, days: u32) -> Self {
        Self {
            start: end - Duration::days(i64::from(days)),
            end,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    pub fn midpoint(&self) -> DateTime<Utc> {
        self.start + (self.end - self.start) / 2
    }
}

/// Aggregated intelligence for one competitor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorStats {
    pub competitor: String,
    pub total_mentions: usize,
    /// Mean of the signed sentiment values, in [−1, 1]; 0 with no mentions.
    pub average_sentiment: f64,
    pub product_comparisons: Vec<String>,
    pub market_position: MarketPosition,
    /// The 5 most recent mentions, newest first.
    pub recent_mentions: Vec<CompetitorMention>,
}

/// The competitor-analysis aggregate over one workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorReport {
    pub timeframe: Timeframe,
    pub competitors: Vec<CompetitorStats>,
    pub recommendations: Vec<String>,
    /// Competitors whose coverage is concentrated in the recent half of the
    /// window.
    pub emerging: Vec<String>,
    /// Competitors whose coverage is concentrated in the older half.
    pub declining: Vec<String>,
    pub generated_at: DateTime<Utc>,
}
