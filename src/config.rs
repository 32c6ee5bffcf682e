// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Explicit configuration passed into the collector, summarizer and notifier at call time; credential discovery
// role: config/types
// inputs: Normalized CLI values; env GITHUB_TOKEN / GH_TOKEN / OPENAI_API_KEY / SMTP_PASSWORD; optional `gh` CLI
// outputs: CollectorConfig, SummarizerConfig, NotifierConfig
// side_effects: discover_github_token may spawn `gh auth token`
// invariants:
// - repository is "owner/name" with both parts non-empty
// - window_start < window_end (checked by window())
// - 1 <= page_size <= 100
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

use crate::window::TimeWindow;

pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";
pub const DEFAULT_COMPLETIONS_API: &str = "https://api.openai.com/v1";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_MAX_PAGES: usize = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SMTP_HOST: &str = "smtp.office365.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone)]
pub struct CollectorConfig {
  /// "owner/name"
  pub repository: String,
  pub window_start: DateTime<Utc>,
  pub window_end: DateTime<Utc>,
  pub page_size: u32,
  pub endpoint_base_url: String,
  /// Bearer token; None only when a fixture backend stands in for HTTP.
  pub credential: Option<String>,
  pub max_pages: usize,
  /// Per-request deadline.
  pub timeout: Duration,
}

impl CollectorConfig {
  pub fn new(repository: &str, window: TimeWindow, credential: Option<String>) -> Self {
    Self {
      repository: repository.to_string(),
      window_start: window.start(),
      window_end: window.end(),
      page_size: DEFAULT_PAGE_SIZE,
      endpoint_base_url: DEFAULT_GITHUB_API.to_string(),
      credential,
      max_pages: DEFAULT_MAX_PAGES,
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
  }

  pub fn window(&self) -> Result<TimeWindow> {
    TimeWindow::new(self.window_start, self.window_end)
  }

  pub fn validate(&self) -> Result<()> {
    validate_repository(&self.repository)?;
    self.window()?;

    if !(1..=100).contains(&self.page_size) {
      bail!("page size must be between 1 and 100 (got {})", self.page_size);
    }
    if self.max_pages == 0 {
      bail!("max pages must be at least 1");
    }

    Ok(())
  }

  /// `{base}/repos/{owner}/{name}`
  pub fn repo_url(&self) -> String {
    format!("{}/repos/{}", self.endpoint_base_url.trim_end_matches('/'), self.repository)
  }
}

#[derive(Debug, Clone)]
pub struct SummarizerConfig {
  pub repository: String,
  pub model: String,
  /// Upper word-count target given to the model.
  pub max_words: u32,
  pub temperature: f32,
  pub endpoint_base_url: String,
  pub credential: Option<String>,
  pub timeout: Duration,
}

impl SummarizerConfig {
  pub fn responses_url(&self) -> String {
    format!("{}/responses", self.endpoint_base_url.trim_end_matches('/'))
  }
}

#[derive(Debug, Clone)]
pub struct NotifierConfig {
  pub to: String,
  /// Sender address; also the SMTP login.
  pub from: String,
  pub smtp_host: String,
  pub smtp_port: u16,
  /// SMTP password; None only when a fixture directory stands in for the relay.
  pub credential: Option<String>,
  pub timeout: Duration,
}

pub fn validate_repository(repo: &str) -> Result<()> {
  static RE_REPO: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"^[A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+$").unwrap());

  if repo.trim().is_empty() {
    bail!("repository is required (--repo owner/name or GITHUB_REPOSITORY)");
  }
  if !RE_REPO.is_match(repo) {
    bail!("invalid repository '{}', expected owner/name", repo);
  }

  Ok(())
}

fn non_empty_env(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Discover a GitHub token: env vars first, then `gh auth token` if available.
pub fn discover_github_token() -> Option<String> {
  if let Some(t) = non_empty_env("GITHUB_TOKEN") {
    return Some(t);
  }

  if let Some(t) = non_empty_env("GH_TOKEN") {
    return Some(t);
  }

  if let Ok(output) = std::process::Command::new("gh").args(["auth", "token"]).output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

pub fn discover_completions_key() -> Option<String> {
  non_empty_env("OPENAI_API_KEY")
}

pub fn discover_smtp_password() -> Option<String> {
  non_empty_env("SMTP_PASSWORD")
}

pub fn repository_from_env() -> Option<String> {
  non_empty_env("GITHUB_REPOSITORY")
}
