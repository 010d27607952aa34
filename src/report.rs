//! Plain-text usage report assembled from the interaction log

use crate::db::InteractionLog;
use anyhow::Result;

/// Render the usage statistics report
///
/// Every section has a "nothing yet" line so a fresh log still produces a
/// complete report.
pub fn render_usage_report(log: &InteractionLog) -> Result<String> {
    let most_viewed = log.most_viewed(5)?;
    let recent = log.recent_queries(5)?;
    let feedback = log.feedback_stats()?;

    let mut out = String::from("Most Viewed Failure Modes:\n");
    if most_viewed.is_empty() {
        out.push_str("No failure modes have been viewed yet.\n");
    } else {
        for item in &most_viewed {
            out.push_str(&format!(
                "- {} (viewed {} times)\n",
                item.failure_mode, item.view_count
            ));
        }
    }

    out.push_str("\nRecent User Queries:\n");
    if recent.is_empty() {
        out.push_str("No queries have been made yet.\n");
    } else {
        for entry in &recent {
            out.push_str(&format!("- {}\n", entry.query));
        }
    }

    out.push_str("\nSolution Feedback:\n");
    if feedback.feedback_count_by_mode.is_empty() {
        out.push_str("No solution feedback has been recorded yet.\n");
    } else {
        for (solution_type, avg) in &feedback.avg_rating_by_type {
            out.push_str(&format!(
                "- Average {} rating: {:.1}\n",
                solution_type, avg
            ));
        }
        for (mode, count) in &feedback.feedback_count_by_mode {
            out.push_str(&format!("- {}: {} feedback entries\n", mode, count));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SolutionType;

    #[test]
    fn test_fresh_log_renders_placeholders() {
        let log = InteractionLog::open_in_memory().unwrap();
        let report = render_usage_report(&log).unwrap();

        assert!(report.contains("No failure modes have been viewed yet."));
        assert!(report.contains("No queries have been made yet."));
        assert!(report.contains("No solution feedback has been recorded yet."));
    }

    #[test]
    fn test_populated_log_renders_sections() {
        let log = InteractionLog::open_in_memory().unwrap();
        log.log_view("Information Withholding").unwrap();
        log.log_view("Information Withholding").unwrap();
        log.log_query("explain communication failures").unwrap();
        log.log_feedback(
            "Information Withholding",
            SolutionType::Tactical,
            "Add a checklist",
            Some(4),
            None,
        )
        .unwrap();

        let report = render_usage_report(&log).unwrap();
        assert!(report.contains("- Information Withholding (viewed 2 times)"));
        assert!(report.contains("- explain communication failures"));
        assert!(report.contains("- Average tactical rating: 4.0"));
        assert!(report.contains("- Information Withholding: 1 feedback entries"));
    }
}
