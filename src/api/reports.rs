//! Canned report prompt templates.

/// Report types the facade knows how to prompt for.
pub const REPORT_TYPES: [&str; 3] = ["daily_summary", "agent_performance", "outbound_callbacks"];

/// Prompt sent to the agent for a report type, or `None` for an unknown
/// type.
pub fn report_prompt(report_type: &str, date_from: &str, date_to: &str) -> Option<String> {
    match report_type {
        "daily_summary" => Some(format!(
            "Generate a daily call summary report for {}. Include: total calls by direction, \
             breakdown by answer type, average call duration, and top 5 agents by call volume.",
            date_from
        )),
        "agent_performance" => Some(format!(
            "Generate an agent performance report from {} to {}. Include each agent's total \
             calls, average scorecard score, resolution rate, and their strongest and weakest \
             scoring categories. If scorecard data is not available for the requested dates, \
             check what date range has scorecard data and use that instead, noting the actual \
             dates used.",
            date_from, date_to
        )),
        "outbound_callbacks" => Some(format!(
            "Generate an outbound callback report for {}. How many outbound calls were made, \
             how many were answered by a human, how many were voicemails, and how many were \
             longer than 1 minute?",
            date_from
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_types_have_prompts() {
        for report_type in REPORT_TYPES {
            let prompt = report_prompt(report_type, "2026-02-01", "2026-02-28").unwrap();
            assert!(prompt.contains("2026-02-01"));
        }
    }

    #[test]
    fn test_unknown_type() {
        assert!(report_prompt("weekly_digest", "2026-02-01", "").is_none());
    }
}
