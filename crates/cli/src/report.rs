//! Terminal output: the end-of-run summary (styled text or JSON) and
//! failure messages.

use std::path::Path;

use console::Style;
use serde::Serialize;

use pomerge_core::ResolveReport;

/// Everything printed after a successful run.
#[derive(Debug, Serialize)]
pub struct Summary<'a> {
    pub input: &'a Path,
    pub output: &'a Path,
    #[serde(flatten)]
    pub report: &'a ResolveReport,
}

/// Human-readable summary. The unmatched line only appears when some
/// conflicts had no variant for the label.
pub fn render_text(summary: &Summary<'_>) -> String {
    let counters = &summary.report.counters;
    let mut lines = vec![
        format!("{} Catalog processed", Style::new().green().apply_to("✓")),
        format!("  Input file:   {}", summary.input.display()),
        format!("  Output file:  {}", summary.output.display()),
        format!("  Resolved:     {}", counters.resolved),
    ];
    if counters.unmatched > 0 {
        lines.push(format!(
            "  {} Label \"{}\" not found: {} times",
            Style::new().yellow().apply_to("⚠"),
            summary.report.label,
            counters.unmatched
        ));
    }
    lines.push(format!("  Unmodified:   {}", counters.unmodified));
    lines.push(format!("  Total:        {}", counters.total));
    lines.join("\n")
}

/// Pretty-printed JSON summary.
pub fn render_json(summary: &Summary<'_>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

/// A fatal error line for stderr.
pub fn render_error(message: &str) -> String {
    format!("{} {}", Style::new().red().apply_to("✗"), message)
}

/// Explains a `--strict` failure: some conflicts kept their markers.
pub fn render_strict_failure(label: &str, unmatched: usize) -> String {
    let headline = render_error(&format!(
        "{unmatched} conflicted entries have no \"{label}\" variant"
    ));
    let note = Style::new().dim().apply_to("The output file was written anyway.");
    format!("{headline}\n{note}")
}
