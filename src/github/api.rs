// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fetch single pages of JSON from the source-hosting REST API behind a trait seam
// role: github/api
// inputs: PageRequest (url + query pairs); bearer token; env RAD_TEST_PAGES_FILE for fixtures
// outputs: Page { body, next } with the continuation link already extracted
// side_effects: Network calls to the configured API base (HTTP backend); file read (fixture backend)
// invariants:
// - Non-success statuses surface as RemoteError::RemoteApi with status and body; never swallowed
// - Continuation links are returned verbatim and requested without extra query pairs
// errors: RemoteError (RemoteApi, Transport, Decode)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::config::CollectorConfig;
use crate::error::RemoteError;
use crate::ext::serde_json::JsonFetch;
use crate::github::pagination::parse_next_link;

pub const USER_AGENT: &str = "repo-activity-digest";

/// Env var naming a JSON fixture file that replaces the HTTP backend.
pub const FIXTURE_ENV: &str = "RAD_TEST_PAGES_FILE";

/// A page request: an endpoint URL plus filter parameters.
/// Continuation requests carry the link URL and no extra parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
  pub url: String,
  pub query: Vec<(String, String)>,
}

impl PageRequest {
  pub fn new(url: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      query: Vec::new(),
    }
  }

  pub fn param(mut self, key: &str, value: impl ToString) -> Self {
    self.query.push((key.to_string(), value.to_string()));
    self
  }

  /// URL with query pairs appended in insertion order; identifies a page for cycle detection.
  pub fn full_url(&self) -> String {
    if self.query.is_empty() {
      return self.url.clone();
    }

    let pairs: Vec<String> = self.query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
    let sep = if self.url.contains('?') { '&' } else { '?' };

    format!("{}{}{}", self.url, sep, pairs.join("&"))
  }
}

#[derive(Debug, Clone)]
pub struct Page {
  pub body: serde_json::Value,
  pub next: Option<String>,
}

// --- Trait seam for the paginated REST API ---
pub trait PageSource {
  fn get_page(&self, req: &PageRequest) -> Result<Page, RemoteError>;
}

pub struct HttpPageSource {
  agent: ureq::Agent,
  token: String,
}

impl HttpPageSource {
  pub fn new(token: String, timeout: Duration) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .timeout_global(Some(timeout))
      .http_status_as_error(false)
      .build()
      .into();

    Self { agent, token }
  }
}

impl PageSource for HttpPageSource {
  fn get_page(&self, req: &PageRequest) -> Result<Page, RemoteError> {
    let url = req.full_url();

    let mut builder = self
      .agent
      .get(&req.url)
      .header("Accept", "application/vnd.github+json")
      .header("User-Agent", USER_AGENT)
      .header("Authorization", &format!("Bearer {}", self.token));

    for (k, v) in &req.query {
      builder = builder.query(k, v);
    }

    let mut resp = builder.call().map_err(|e| RemoteError::Transport {
      url: url.clone(),
      message: e.to_string(),
    })?;

    let status = resp.status();
    let next = resp
      .headers()
      .get("link")
      .and_then(|v| v.to_str().ok())
      .and_then(parse_next_link);

    let text = resp.body_mut().read_to_string().map_err(|e| RemoteError::Transport {
      url: url.clone(),
      message: e.to_string(),
    })?;

    if !status.is_success() {
      return Err(RemoteError::RemoteApi {
        url,
        status: status.as_u16(),
        body: text,
      });
    }

    let body = serde_json::from_str::<serde_json::Value>(&text).map_err(|e| RemoteError::Decode {
      url: url.clone(),
      message: e.to_string(),
    })?;

    Ok(Page { body, next })
  }
}

/// Canned pages keyed by URL, loaded from a JSON document:
///
/// ```json
/// { "https://api.github.com/repos/o/r/commits": { "status": 200, "body": [], "next": null } }
/// ```
///
/// Lookup tries the full URL (with query) first, then the bare URL.
pub struct FixturePageSource {
  pages: HashMap<String, serde_json::Value>,
  requested: RefCell<Vec<String>>,
}

impl FixturePageSource {
  pub fn from_value(v: serde_json::Value) -> Result<Self> {
    let Some(map) = v.as_object() else {
      bail!("page fixtures must be a JSON object keyed by URL");
    };

    let pages = map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();

    Ok(Self {
      pages,
      requested: RefCell::new(Vec::new()),
    })
  }

  pub fn from_file(path: &Path) -> Result<Self> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading page fixtures {}", path.display()))?;
    let v: serde_json::Value =
      serde_json::from_str(&text).with_context(|| format!("parsing page fixtures {}", path.display()))?;

    Self::from_value(v)
  }

  /// Full URLs requested so far, in order.
  #[cfg(test)]
  pub fn requested(&self) -> Vec<String> {
    self.requested.borrow().clone()
  }
}

impl PageSource for FixturePageSource {
  fn get_page(&self, req: &PageRequest) -> Result<Page, RemoteError> {
    let url = req.full_url();
    self.requested.borrow_mut().push(url.clone());

    let Some(entry) = self.pages.get(&url).or_else(|| self.pages.get(&req.url)) else {
      return Err(RemoteError::RemoteApi {
        url: url.clone(),
        status: 404,
        body: format!("no fixture for {}", url),
      });
    };

    let status = entry.fetch("status").to::<u16>().unwrap_or(200);
    let body = entry.fetch("body").value().cloned().unwrap_or(serde_json::Value::Null);

    if !(200..300).contains(&status) {
      let body = match body {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
      };
      return Err(RemoteError::RemoteApi { url, status, body });
    }

    let next = entry.fetch("next").to::<String>();

    Ok(Page { body, next })
  }
}

pub fn env_wants_fixture() -> bool {
  std::env::var(FIXTURE_ENV).map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Select the page backend: fixtures when requested via env, otherwise HTTP with the configured token.
pub fn build_source(cfg: &CollectorConfig) -> Result<Box<dyn PageSource>> {
  if env_wants_fixture() {
    let path = std::env::var(FIXTURE_ENV)?;
    return Ok(Box::new(FixturePageSource::from_file(Path::new(&path))?));
  }

  let Some(token) = cfg.credential.clone() else {
    bail!("Missing token. Set GITHUB_TOKEN or run: gh auth login");
  };

  Ok(Box::new(HttpPageSource::new(token, cfg.timeout)))
}
