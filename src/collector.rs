// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Collect one window of commits, pull requests and issues into a Report
// role: collection/orchestrator
// inputs: CollectorConfig, PageSource
// outputs: Report (write-once; rendered by crate::render)
// side_effects: Page requests through the supplied source only
// invariants:
// - Commits are windowed server-side (since/until) and kept as returned, in page order
// - Pull requests and issues keep `start <= updated_at < end`, in server order (updated desc), never re-sorted
// - Issues carrying a `pull_request` marker never appear in the issue section
// errors: First failing page aborts the run (RemoteError wrapped with endpoint context)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeSet;

use anyhow::{Context, Result};

use crate::config::CollectorConfig;
use crate::github::api::{PageRequest, PageSource};
use crate::github::pagination::{fetch_all_pages, fetch_pages_while};
use crate::model::{ActivityRecord, CommitItem, IssueItem, PullRequestItem, Report};
use crate::window::{TimeWindow, iso_zulu, parse_api_timestamp};

/// Returns the raw `updated_at` string when it falls inside the window.
fn updated_in_window(window: &TimeWindow, kind: &str, number: i64, updated_at: Option<&str>) -> Option<String> {
  let raw = updated_at?;

  let Some(ts) = parse_api_timestamp(raw) else {
    tracing::warn!(kind, number, updated_at = raw, "skipping item with unparseable updated_at");
    return None;
  };

  window.contains(ts).then(|| raw.to_string())
}

/// Pages are sorted by `updated` descending; once a page ends before the window start,
/// no later page can hold in-window items.
fn page_reaches_window<'a, I>(window: &TimeWindow, mut updated: I) -> bool
where
  I: Iterator<Item = Option<&'a str>>,
{
  match updated.next().flatten().and_then(parse_api_timestamp) {
    Some(ts) => ts >= window.start(),
    None => true,
  }
}

fn updated_desc_request(url: String, page_size: u32) -> PageRequest {
  PageRequest::new(url)
    .param("state", "all")
    .param("sort", "updated")
    .param("direction", "desc")
    .param("per_page", page_size)
}

pub fn collect_commits(cfg: &CollectorConfig, window: &TimeWindow, source: &dyn PageSource) -> Result<Vec<ActivityRecord>> {
  let first = PageRequest::new(format!("{}/commits", cfg.repo_url()))
    .param("since", iso_zulu(window.start()))
    .param("until", iso_zulu(window.end()))
    .param("per_page", cfg.page_size);

  let items: Vec<CommitItem> = fetch_all_pages(source, first, cfg.max_pages).context("fetching commits")?;
  let records: Vec<ActivityRecord> = items.iter().map(ActivityRecord::from_commit).collect();

  let authors: BTreeSet<&str> = records.iter().map(|r| r.author()).filter(|a| !a.is_empty()).collect();
  tracing::info!(count = records.len(), authors = authors.len(), "collected commits");

  Ok(records)
}

pub fn collect_pull_requests(
  cfg: &CollectorConfig,
  window: &TimeWindow,
  source: &dyn PageSource,
) -> Result<Vec<ActivityRecord>> {
  let first = updated_desc_request(format!("{}/pulls", cfg.repo_url()), cfg.page_size);

  let items: Vec<PullRequestItem> = fetch_pages_while(source, first, cfg.max_pages, |page: &[PullRequestItem]| {
    page_reaches_window(window, page.iter().rev().map(|p| p.updated_at.as_deref()))
  })
  .context("fetching pull requests")?;

  let records: Vec<ActivityRecord> = items
    .into_iter()
    .filter_map(|pr| {
      let updated_at = updated_in_window(window, "pull_request", pr.number, pr.updated_at.as_deref())?;

      Some(ActivityRecord::PullRequest {
        number: pr.number,
        state: pr.state,
        updated_at,
        title: pr.title,
      })
    })
    .collect();

  tracing::info!(count = records.len(), "collected pull requests in window");

  Ok(records)
}

pub fn collect_issues(cfg: &CollectorConfig, window: &TimeWindow, source: &dyn PageSource) -> Result<Vec<ActivityRecord>> {
  let first = updated_desc_request(format!("{}/issues", cfg.repo_url()), cfg.page_size);

  let items: Vec<IssueItem> = fetch_pages_while(source, first, cfg.max_pages, |page: &[IssueItem]| {
    page_reaches_window(window, page.iter().rev().map(|i| i.updated_at.as_deref()))
  })
  .context("fetching issues")?;

  let records: Vec<ActivityRecord> = items
    .into_iter()
    .filter(|issue| !issue.is_pull_request())
    .filter_map(|issue| {
      let updated_at = updated_in_window(window, "issue", issue.number, issue.updated_at.as_deref())?;

      Some(ActivityRecord::Issue {
        number: issue.number,
        state: issue.state,
        updated_at,
        title: issue.title,
      })
    })
    .collect();

  tracing::info!(count = records.len(), "collected issues in window");

  Ok(records)
}

/// Fetch all three collections for the configured window.
pub fn collect(cfg: &CollectorConfig, source: &dyn PageSource) -> Result<Report> {
  cfg.validate()?;
  let window = cfg.window()?;

  tracing::info!(repo = %cfg.repository, start = %iso_zulu(window.start()), end = %iso_zulu(window.end()), "collecting activity");

  let commits = collect_commits(cfg, &window, source)?;
  let pull_requests = collect_pull_requests(cfg, &window, source)?;
  let issues = collect_issues(cfg, &window, source)?;

  Ok(Report {
    window,
    commits,
    pull_requests,
    issues,
  })
}
