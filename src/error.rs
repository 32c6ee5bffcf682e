// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed failures raised at the HTTP seam (source-hosting API and completion endpoint)
// role: errors/taxonomy
// outputs: RemoteError enum wrapped into anyhow by callers
// invariants:
// - Every non-success status becomes RemoteApi with the status and the raw body
// - No variant is retried; any of them aborts the run
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
  /// The remote endpoint answered with a non-success status.
  #[error("remote API error ({url}): {status} - {body}")]
  RemoteApi { url: String, status: u16, body: String },

  /// The request never produced a response (connect, TLS, timeout, read).
  #[error("request to {url} failed: {message}")]
  Transport { url: String, message: String },

  /// The response arrived but its body had an unexpected shape.
  #[error("unexpected response from {url}: {message}")]
  Decode { url: String, message: String },

  #[error("pagination exceeded {limit} pages")]
  PageLimit { limit: usize },

  #[error("pagination link points back to an already fetched page: {url}")]
  CyclicLink { url: String },
}

#[cfg(test)]
impl RemoteError {
  pub fn status(&self) -> Option<u16> {
    match self {
      RemoteError::RemoteApi { status, .. } => Some(*status),
      _ => None,
    }
  }
}
