//! Final batch summary. Pure formatting: one row per outcome, rendered in
//! the order received (completion order) — no resorting that could hide
//! which jobs were slow or stuck.

use std::fmt::Write;

use crate::pipeline::job_runner::Outcome;

pub fn render(outcomes: &[Outcome]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<30} {:<44} {:<14} {}",
        "Image", "Model", "Status", "Credits"
    );

    for outcome in outcomes {
        let model = outcome
            .artifact_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        let credits = outcome
            .credits
            .map(|c| c.to_string())
            .unwrap_or_else(|| "?".to_string());

        let _ = write!(
            out,
            "{:<30} {:<44} {:<14} {}",
            outcome.image_id, model, outcome.status, credits
        );
        if let Some(detail) = &outcome.detail {
            let _ = write!(out, "  ({detail})");
        }
        let _ = writeln!(out);
    }

    out
}
