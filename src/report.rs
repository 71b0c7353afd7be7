//! Report text for a job run
//!
//! A clean run is summarized in one line; as soon as any source reported
//! an error the full per-source detail is sent instead.

use crate::run::{JobReport, SourceOutcome};

const SEPARATOR: &str =
    "--------------------------------------------------------------------";

/// One-line summary for a run without errors
pub fn summary_text(report: &JobReport) -> String {
    format!(
        "rsyncr processed {} sources for config {} without errors",
        report.results.len(),
        report.job
    )
}

/// Full per-source detail
pub fn detail_text(report: &JobReport) -> String {
    let mut text = format!("rsyncr is processing config {}\n", report.job);

    for result in &report.results {
        text.push_str(&format!(
            "\nSource {}: {} to {}\n",
            result.name, result.location, result.target
        ));
        match &result.outcome {
            SourceOutcome::Ok => {}
            SourceOutcome::Partial { code } => {
                text.push_str(&format!("[partial transfer, exit {}]\n", code));
            }
            SourceOutcome::Fatal { .. } => text.push_str("[FATAL]\n"),
        }
        text.push_str(&result.output);
        if !result.output.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(SEPARATOR);
        text.push('\n');
    }

    if report.skipped > 0 {
        text.push_str(&format!(
            "\n{} source(s) skipped after fatal error\n",
            report.skipped
        ));
    }
    text
}

/// The text to deliver for `report`
pub fn notification_text(report: &JobReport) -> String {
    if report.has_errors() {
        detail_text(report)
    } else {
        summary_text(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::run::SourceResult;
    use chrono::Utc;

    fn result(name: &str, outcome: SourceOutcome, output: &str) -> SourceResult {
        SourceResult {
            name: name.to_string(),
            location: format!("/{}/", name),
            target: format!("/b/{}/", name),
            command: Vec::new(),
            outcome,
            output: output.to_string(),
        }
    }

    fn report(results: Vec<SourceResult>, skipped: usize) -> JobReport {
        JobReport {
            job: "dude".to_string(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            results,
            skipped,
        }
    }

    #[test]
    fn test_clean_run_is_summary() {
        let r = report(
            vec![
                result("a", SourceOutcome::Ok, "fine"),
                result("b", SourceOutcome::Ok, "fine"),
            ],
            0,
        );
        assert_eq!(
            notification_text(&r),
            "rsyncr processed 2 sources for config dude without errors"
        );
    }

    #[test]
    fn test_partial_gives_detail() {
        let r = report(
            vec![
                result("a", SourceOutcome::Ok, "fine\n"),
                result("b", SourceOutcome::Partial { code: 23 }, "permission denied"),
            ],
            0,
        );
        let text = notification_text(&r);
        assert!(text.starts_with("rsyncr is processing config dude\n"));
        assert!(text.contains("\nSource a: /a/ to /b/a/\nfine\n"));
        assert!(text.contains("[partial transfer, exit 23]\npermission denied\n"));
        assert_eq!(text.matches(SEPARATOR).count(), 2);
    }

    #[test]
    fn test_fatal_detail_mentions_skipped() {
        let r = report(
            vec![result(
                "a",
                SourceOutcome::Fatal {
                    message: "boom".to_string(),
                },
                "boom",
            )],
            3,
        );
        let text = notification_text(&r);
        assert!(text.contains("[FATAL]\nboom"));
        assert!(text.contains("3 source(s) skipped"));
    }
}
