//! Rendering of the workflow result for terminal or file output.

use nd_agents::WorkflowReport;

pub fn to_markdown(result: &WorkflowReport) -> String {
    let mut out = result.report.to_markdown();

    if let Some(insights) = &result.competitor_analysis {
        out.push_str("\n## Competitor analysis\n");
        if insights.report.competitors.is_empty() {
            out.push_str("\nNo competitor cleared the mention threshold this window.\n");
        }
        for stats in &insights.report.competitors {
            out.push_str(&format!(
                "\n### {}\n\n{} mention(s), average sentiment {:+.2}, market position: {}\n",
                stats.competitor,
                stats.total_mentions,
                stats.average_sentiment,
                stats.market_position
            ));
            for mention in &stats.recent_mentions {
                out.push_str(&format!(
                    "- {}: {}\n",
                    mention.timestamp.format("%Y-%m-%d"),
                    mention.context
                ));
            }
        }
        if !insights.report.recommendations.is_empty() {
            out.push_str("\nRecommendations:\n");
            for recommendation in &insights.report.recommendations {
                out.push_str(&format!("- {recommendation}\n"));
            }
        }
        if !insights.report.emerging.is_empty() {
            out.push_str(&format!(
                "\nEmerging coverage: {}\n",
                insights.report.emerging.join(", ")
            ));
        }
        if !insights.report.declining.is_empty() {
            out.push_str(&format!(
                "Declining coverage: {}\n",
                insights.report.declining.join(", ")
            ));
        }
    }

    if !result.failed_tasks.is_empty() {
        out.push_str(&format!(
            "\n_{} research task(s) failed and contributed no articles: {}_\n",
            result.failed_tasks.len(),
            result.failed_tasks.join(", ")
        ));
    }

    out
}

pub fn to_json(result: &WorkflowReport) -> serde_json::Result<String> {
    let competitor_analysis = result.competitor_analysis.as_ref().map(|insights| {
        serde_json::json!({
            "mentions": insights.mentions,
            "report": insights.report,
        })
    });
    let value = serde_json::json!({
        "articles": result.articles,
        "report": result.report,
        "competitor_analysis": competitor_analysis,
        "failed_tasks": result.failed_tasks,
    });
    serde_json::to_string_pretty(&value)
}
