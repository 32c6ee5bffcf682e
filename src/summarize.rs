// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn the collected activity text into a short prose summary via a completion endpoint
// role: summarizer/collaborator
// inputs: SummarizerConfig; activity report text (opaque UTF-8); env RAD_TEST_SUMMARY_JSON for fixtures
// outputs: Trimmed summary text
// side_effects: One POST to `{api}/responses` (HTTP backend)
// invariants:
// - Activity text is embedded verbatim after the instructions and repository line
// - Non-success status surfaces as RemoteError::RemoteApi; no retry
// errors: RemoteError (RemoteApi, Transport, Decode when no text can be extracted)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::config::SummarizerConfig;
use crate::error::RemoteError;
use crate::ext::serde_json::JsonFetch;
use crate::github::api::USER_AGENT;

pub const FIXTURE_ENV: &str = "RAD_TEST_SUMMARY_JSON";

pub fn build_prompt(repository: &str, max_words: u32, activity: &str) -> String {
  format!(
    "You are generating a weekly engineering summary for leadership. \
     Summarize the previous week of GitHub activity. Include: \
     (1) major completed work, \
     (2) in-progress or changing areas, \
     (3) notable risks/blockers/security-relevant items. \
     Keep it under {} words, clear and factual.\n\n\
     Repository: {}\n\n\
     {}",
    max_words, repository, activity
  )
}

// --- Trait seam for the completion endpoint ---
pub trait CompletionApi {
  /// POST a request body, returning the parsed JSON response.
  fn create_response(&self, request: &serde_json::Value) -> Result<serde_json::Value, RemoteError>;
}

pub struct HttpCompletionApi {
  agent: ureq::Agent,
  url: String,
  key: String,
}

impl HttpCompletionApi {
  pub fn new(url: String, key: String, timeout: Duration) -> Self {
    let agent: ureq::Agent = ureq::Agent::config_builder()
      .timeout_global(Some(timeout))
      .http_status_as_error(false)
      .build()
      .into();

    Self { agent, url, key }
  }
}

impl CompletionApi for HttpCompletionApi {
  fn create_response(&self, request: &serde_json::Value) -> Result<serde_json::Value, RemoteError> {
    let mut resp = self
      .agent
      .post(&self.url)
      .header("User-Agent", USER_AGENT)
      .header("Authorization", &format!("Bearer {}", self.key))
      .send_json(request)
      .map_err(|e| RemoteError::Transport {
        url: self.url.clone(),
        message: e.to_string(),
      })?;

    let status = resp.status();
    let text = resp.body_mut().read_to_string().map_err(|e| RemoteError::Transport {
      url: self.url.clone(),
      message: e.to_string(),
    })?;

    if !status.is_success() {
      return Err(RemoteError::RemoteApi {
        url: self.url.clone(),
        status: status.as_u16(),
        body: text,
      });
    }

    serde_json::from_str(&text).map_err(|e| RemoteError::Decode {
      url: self.url.clone(),
      message: e.to_string(),
    })
  }
}

/// Canned response taken from `RAD_TEST_SUMMARY_JSON`.
struct EnvCompletionApi;

impl CompletionApi for EnvCompletionApi {
  fn create_response(&self, _request: &serde_json::Value) -> Result<serde_json::Value, RemoteError> {
    let raw = std::env::var(FIXTURE_ENV).unwrap_or_default();

    serde_json::from_str(&raw).map_err(|e| RemoteError::Decode {
      url: FIXTURE_ENV.to_string(),
      message: e.to_string(),
    })
  }
}

pub fn build_api(cfg: &SummarizerConfig) -> Result<Box<dyn CompletionApi>> {
  if std::env::var(FIXTURE_ENV).is_ok() {
    return Ok(Box::new(EnvCompletionApi));
  }

  let Some(key) = cfg.credential.clone() else {
    bail!("Missing completion API key. Set OPENAI_API_KEY");
  };

  Ok(Box::new(HttpCompletionApi::new(cfg.responses_url(), key, cfg.timeout)))
}

/// Prefer the aggregated `output_text`; otherwise join every `output[].content[].text` part.
pub fn extract_output_text(url: &str, response: &serde_json::Value) -> Result<String, RemoteError> {
  if let Some(text) = response.fetch("output_text").as_str() {
    if !text.trim().is_empty() {
      return Ok(text.trim().to_string());
    }
  }

  let parts: Vec<&str> = response
    .fetch("output")
    .value()
    .and_then(|v| v.as_array())
    .map(|outputs| {
      outputs
        .iter()
        .filter_map(|o| o.fetch("content").value().and_then(|c| c.as_array()))
        .flatten()
        .filter_map(|c| c.fetch("text").as_str())
        .collect()
    })
    .unwrap_or_default();

  let joined = parts.concat();

  if joined.trim().is_empty() {
    return Err(RemoteError::Decode {
      url: url.to_string(),
      message: "response contains no output text".into(),
    });
  }

  Ok(joined.trim().to_string())
}

pub fn summarize(cfg: &SummarizerConfig, api: &dyn CompletionApi, activity: &str) -> Result<String> {
  let prompt = build_prompt(&cfg.repository, cfg.max_words, activity);

  let request = serde_json::json!({
    "model": cfg.model,
    "input": prompt,
    "temperature": cfg.temperature,
  });

  tracing::info!(model = %cfg.model, prompt_bytes = prompt.len(), "requesting summary");

  let response = api.create_response(&request).context("requesting summary")?;
  let summary = extract_output_text(&cfg.responses_url(), &response)?;

  Ok(summary)
}
