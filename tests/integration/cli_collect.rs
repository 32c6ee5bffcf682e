use serde_json::json;
use test_support::{failing_page, page};

const COMMITS: &str = "https://api.github.com/repos/octocat/hello/commits";
const COMMITS_PAGE_2: &str = "https://api.github.com/repositories/42/commits?page=2";
const PULLS: &str = "https://api.github.com/repos/octocat/hello/pulls";
const ISSUES: &str = "https://api.github.com/repos/octocat/hello/issues";

const MIXED_WEEK: &str = "Week window (UTC): 2025-01-06T00:00:00+00:00 to 2025-01-13T00:00:00+00:00

Commits (3):
- 2025-01-07T10:00:00Z: feat: add pagination helper
- 2025-01-08T11:30:00Z: fix: trim summary output
- 2025-01-10T09:15:00Z: docs: describe report layout

Pull Requests (2):
- PR #12 [open] updated 2025-01-12T18:00:00Z: Add weekly digest
- PR #10 [closed] updated 2025-01-06T00:00:00Z: Handle empty weeks

Issues (1):
- Issue #8 [open] updated 2025-01-09T08:30:00Z: Crash when token missing";

fn commit(date: &str, message: &str) -> serde_json::Value {
  json!({ "sha": "0123456789abcdef", "commit": { "author": { "name": "Fixture Bot", "date": date }, "message": message } })
}

fn item(number: i64, state: &str, updated_at: &str, title: &str) -> serde_json::Value {
  json!({ "number": number, "state": state, "updated_at": updated_at, "title": title })
}

fn mixed_week_pages() -> serde_json::Value {
  let mut linked = item(14, "open", "2025-01-10T12:00:00Z", "Add weekly digest (as issue)");
  linked["pull_request"] = json!({ "url": "https://api.github.com/repos/octocat/hello/pulls/14" });

  json!({
    COMMITS: page(json!([
      commit("2025-01-07T10:00:00Z", "feat: add pagination helper\n\nFollows Link headers."),
      commit("2025-01-08T11:30:00Z", "fix: trim summary output")
    ]), Some(COMMITS_PAGE_2)),
    COMMITS_PAGE_2: page(json!([commit("2025-01-10T09:15:00Z", "docs: describe report layout")]), None),
    PULLS: page(json!([
      item(13, "open", "2025-01-13T00:00:00Z", "Too late"),
      item(12, "open", "2025-01-12T18:00:00Z", "Add weekly digest"),
      item(10, "closed", "2025-01-06T00:00:00Z", "Handle empty weeks"),
      item(9, "closed", "2025-01-02T00:00:00Z", "Too early")
    ]), None),
    ISSUES: page(json!([
      linked,
      item(8, "open", "2025-01-09T08:30:00Z", "Crash when token missing"),
      item(3, "closed", "2024-12-20T00:00:00Z", "Old report")
    ]), None)
  })
}

fn run_collect(pages: &serde_json::Value, out: &str) -> std::process::Output {
  let dir = test_support::tempdir();
  let fixtures = test_support::write_page_fixtures(dir.path(), pages);

  test_support::cmd_bin()
    .env(test_support::PAGES_ENV, &fixtures)
    .args([
      "collect",
      "--repo",
      "octocat/hello",
      "--since",
      "2025-01-06T00:00:00Z",
      "--until",
      "2025-01-13T00:00:00Z",
      "--out",
      out,
    ])
    .output()
    .unwrap()
}

#[test]
fn collect_writes_mixed_week_report() {
  test_support::init_insta();
  let outdir = test_support::tempdir();
  let out_path = outdir.path().join("reports/activity.txt");

  let out = run_collect(&mixed_week_pages(), out_path.to_str().unwrap());
  assert!(out.status.success(), "collect failed: {}", String::from_utf8_lossy(&out.stderr));

  let text = test_support::read_text(&out_path);
  assert_eq!(text, MIXED_WEEK);
  insta::assert_snapshot!("collect_mixed_week", text);
}

#[test]
fn collect_is_byte_identical_across_runs() {
  let outdir = test_support::tempdir();
  let first = outdir.path().join("a.txt");
  let second = outdir.path().join("b.txt");

  assert!(run_collect(&mixed_week_pages(), first.to_str().unwrap()).status.success());
  assert!(run_collect(&mixed_week_pages(), second.to_str().unwrap()).status.success());

  assert_eq!(std::fs::read(&first).unwrap(), std::fs::read(&second).unwrap());
}

#[test]
fn collect_empty_week_renders_none_sections() {
  let pages = json!({
    COMMITS: page(json!([]), None),
    PULLS: page(json!([item(1, "closed", "2024-11-01T00:00:00Z", "Ancient")]), None),
    ISSUES: page(json!([]), None)
  });

  let out = run_collect(&pages, "-");
  assert!(out.status.success(), "collect failed: {}", String::from_utf8_lossy(&out.stderr));

  let stdout = String::from_utf8_lossy(&out.stdout);
  assert_eq!(
    stdout,
    "Week window (UTC): 2025-01-06T00:00:00+00:00 to 2025-01-13T00:00:00+00:00\n\n\
     Commits (0):\n- None\n\n\
     Pull Requests (0):\n- None\n\n\
     Issues (0):\n- None\n"
  );
}

#[test]
fn collect_aborts_on_failed_page_without_writing_output() {
  let mut pages = mixed_week_pages();
  pages[COMMITS_PAGE_2] = failing_page(401, "{\"message\":\"Bad credentials\"}");

  let outdir = test_support::tempdir();
  let out_path = outdir.path().join("activity.txt");

  let out = run_collect(&pages, out_path.to_str().unwrap());
  assert!(!out.status.success());

  let err = String::from_utf8_lossy(&out.stderr);
  assert!(err.contains("fetching commits"), "stderr: {err}");
  assert!(err.contains("401"), "stderr: {err}");
  assert!(err.contains("Bad credentials"), "stderr: {err}");
  assert!(!out_path.exists());
}

#[test]
fn collect_rejects_malformed_repository() {
  let out = test_support::cmd_bin()
    .env(test_support::PAGES_ENV, "unused.json")
    .args(["collect", "--repo", "just-a-name"])
    .output()
    .unwrap();

  assert!(!out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("expected owner/name"));
}

#[test]
fn collect_requires_a_token_without_fixtures() {
  // Empty PATH hides any `gh` CLI from token discovery.
  let out = test_support::cmd_bin()
    .env("PATH", "")
    .args(["collect", "--repo", "octocat/hello"])
    .output()
    .unwrap();

  assert!(!out.status.success());
  assert!(String::from_utf8_lossy(&out.stderr).contains("Missing token"));
}
