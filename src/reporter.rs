use tracing::info;

use crate::types::{ChannelReport, ScreenSummary};

/// Emit a channel fetch report as a single JSON line to stdout.
pub fn report_channel(report: &ChannelReport) {
    if let Ok(json) = serde_json::to_string(report) {
        println!("{json}");
    }
}

/// Log the human-readable completion block, then emit the summary as
/// pretty-printed JSON to stdout.
pub fn report_screen_summary(summary: &ScreenSummary) {
    for line in completion_lines(summary) {
        info!("{line}");
    }
    if let Ok(json) = serde_json::to_string_pretty(summary) {
        println!("{json}");
    }
}

/// Completion block: what was screened, what survived, where it went.
pub fn completion_lines(summary: &ScreenSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "Screened {} address(es) from {} file(s), {} failed",
        summary.addresses_screened, summary.files_processed, summary.addresses_failed
    )];
    if summary.files_deleted > 0 {
        lines.push(format!(
            "Deleted {} list(s) with no qualifying address",
            summary.files_deleted
        ));
    }
    if summary.resumed_results > 0 {
        lines.push(format!(
            "Carried over {} result(s) from the previous run",
            summary.resumed_results
        ));
    }
    lines.push(format!(
        "Qualifying: {} raw, {} after dedup",
        summary.raw_results, summary.deduplicated_results
    ));
    lines.push(format!("JSON results: {}", summary.output_json));
    lines.push(format!("Text results: {}", summary.output_txt));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> ScreenSummary {
        ScreenSummary {
            timestamp: "2026-01-01T00:00:00+00:00".into(),
            files_processed: 3,
            files_deleted: 0,
            addresses_screened: 12,
            addresses_failed: 2,
            resumed_results: 0,
            raw_results: 5,
            deduplicated_results: 4,
            output_json: "ad.json".into(),
            output_txt: "ad_txt/addresses.txt".into(),
        }
    }

    #[test]
    fn completion_lines_basic() {
        assert_eq!(
            completion_lines(&summary()),
            vec![
                "Screened 12 address(es) from 3 file(s), 2 failed",
                "Qualifying: 5 raw, 4 after dedup",
                "JSON results: ad.json",
                "Text results: ad_txt/addresses.txt",
            ]
        );
    }

    #[test]
    fn completion_lines_mention_deletions_and_resume() {
        let mut s = summary();
        s.files_deleted = 1;
        s.resumed_results = 7;
        let lines = completion_lines(&s);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "Deleted 1 list(s) with no qualifying address");
        assert_eq!(lines[2], "Carried over 7 result(s) from the previous run");
    }
}
