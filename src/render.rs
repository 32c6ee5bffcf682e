// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Render a Report into the flat text consumed verbatim by the summarizer
// role: rendering/text
// inputs: Report
// outputs: UTF-8 text: window line, blank line, then Commits / Pull Requests / Issues sections
// invariants:
// - Each section header carries its count; an empty section renders exactly one `- None` line
// - Sections are separated by one blank line; no trailing newline
// - Pure function of the Report: identical inputs give byte-identical text
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::model::{ActivityRecord, Report};
use crate::window::iso_offset;

fn render_section(title: &str, records: &[ActivityRecord]) -> String {
  let body = if records.is_empty() {
    "- None".to_string()
  } else {
    records.iter().map(ActivityRecord::line).collect::<Vec<_>>().join("\n")
  };

  format!("{} ({}):\n{}", title, records.len(), body)
}

pub fn render_report(report: &Report) -> String {
  let header = format!(
    "Week window (UTC): {} to {}",
    iso_offset(report.window.start()),
    iso_offset(report.window.end())
  );

  [
    header,
    render_section("Commits", &report.commits),
    render_section("Pull Requests", &report.pull_requests),
    render_section("Issues", &report.issues),
  ]
  .join("\n\n")
}
