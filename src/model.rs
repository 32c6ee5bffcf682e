// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Wire types for the commits/pulls/issues endpoints and the in-memory activity report
// role: model/types
// outputs: Deserializable API items, ActivityRecord, Report
// invariants:
// - Wire structs only name fields needed for a one-line rendering; everything else is ignored
// - Records are built once per run and never mutated afterwards
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Deserializer};

use crate::window::TimeWindow;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CommitPerson {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub date: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CommitDetail {
  #[serde(default)]
  pub author: Option<CommitPerson>,
  #[serde(default)]
  pub message: String,
}

/// Item of `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Deserialize, Clone)]
pub struct CommitItem {
  pub commit: CommitDetail,
}

/// Item of `GET /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Deserialize, Clone)]
pub struct PullRequestItem {
  pub number: i64,
  #[serde(default)]
  pub state: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub updated_at: Option<String>,
}

/// Item of `GET /repos/{owner}/{repo}/issues`.
///
/// The issues endpoint also returns pull requests; those carry a `pull_request` key.
#[derive(Debug, Deserialize, Clone)]
pub struct IssueItem {
  pub number: i64,
  #[serde(default)]
  pub state: String,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub updated_at: Option<String>,
  /// `Some` whenever the key is present, including `"pull_request": null`.
  #[serde(default, deserialize_with = "present_key")]
  pub pull_request: Option<serde_json::Value>,
}

fn present_key<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
  D: Deserializer<'de>,
{
  serde_json::Value::deserialize(deserializer).map(Some)
}

impl IssueItem {
  pub fn is_pull_request(&self) -> bool {
    self.pull_request.is_some()
  }
}

/// One line of activity in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityRecord {
  Commit {
    timestamp: String,
    author: String,
    message: String,
  },
  PullRequest {
    number: i64,
    state: String,
    updated_at: String,
    title: String,
  },
  Issue {
    number: i64,
    state: String,
    updated_at: String,
    title: String,
  },
}

impl ActivityRecord {
  pub fn from_commit(item: &CommitItem) -> Self {
    let author = item.commit.author.clone().unwrap_or_default();

    ActivityRecord::Commit {
      timestamp: author.date.unwrap_or_default(),
      author: author.name.unwrap_or_default(),
      message: item.commit.message.clone(),
    }
  }

  /// Commit author name; empty for other records.
  pub fn author(&self) -> &str {
    match self {
      ActivityRecord::Commit { author, .. } => author,
      _ => "",
    }
  }

  /// Single rendered line, without a trailing newline.
  pub fn line(&self) -> String {
    match self {
      ActivityRecord::Commit { timestamp, message, .. } => {
        let subject = message.lines().next().unwrap_or("");
        format!("- {}: {}", timestamp, subject)
      }
      ActivityRecord::PullRequest {
        number,
        state,
        updated_at,
        title,
      } => format!("- PR #{} [{}] updated {}: {}", number, state, updated_at, title),
      ActivityRecord::Issue {
        number,
        state,
        updated_at,
        title,
      } => format!("- Issue #{} [{}] updated {}: {}", number, state, updated_at, title),
    }
  }
}

/// Write-once result of a collection run.
#[derive(Debug, Clone)]
pub struct Report {
  pub window: TimeWindow,
  pub commits: Vec<ActivityRecord>,
  pub pull_requests: Vec<ActivityRecord>,
  pub issues: Vec<ActivityRecord>,
}
