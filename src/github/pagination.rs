// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Follow `Link: rel="next"` continuation pointers and accumulate typed items across pages
// role: github/pagination
// inputs: PageSource, first PageRequest, page cap, per-page continue predicate
// outputs: Vec<T> in page-arrival order
// invariants:
// - Terminates: stops on a page without a next link, on the predicate, on the page cap, or on a repeated URL
// - Accumulated length equals the sum of item counts of the fetched pages
// - Any failed page aborts the whole fetch; nothing partial is returned
// errors: RemoteError (page failures, Decode for non-array bodies, PageLimit, CyclicLink)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;

use crate::error::RemoteError;
use crate::github::api::{PageRequest, PageSource};

/// Extract the `rel="next"` target from an RFC 8288 `Link` header value.
pub fn parse_next_link(header: &str) -> Option<String> {
  static RE_LINK: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r#"<([^>]*)>\s*;\s*rel\s*=\s*"?([^",;]+)"?"#).unwrap());

  RE_LINK.captures_iter(header).find_map(|c| {
    let url = c.get(1)?.as_str();
    let rel = c.get(2)?.as_str();

    rel
      .split_whitespace()
      .any(|r| r.eq_ignore_ascii_case("next"))
      .then(|| url.to_string())
  })
}

fn decode_items<T: DeserializeOwned>(url: &str, body: serde_json::Value) -> Result<Vec<T>, RemoteError> {
  let serde_json::Value::Array(values) = body else {
    return Err(RemoteError::Decode {
      url: url.to_string(),
      message: "expected a JSON array of items".into(),
    });
  };

  values
    .into_iter()
    .enumerate()
    .map(|(idx, v)| {
      serde_json::from_value::<T>(v).map_err(|e| RemoteError::Decode {
        url: url.to_string(),
        message: format!("item {}: {}", idx, e),
      })
    })
    .collect()
}

/// Fetch `first` and every page reachable through continuation links.
///
/// `keep_going` sees each decoded page before it is appended; returning false stops
/// after that page even when a next link exists.
pub fn fetch_pages_while<T, F>(
  source: &dyn PageSource,
  first: PageRequest,
  max_pages: usize,
  mut keep_going: F,
) -> Result<Vec<T>, RemoteError>
where
  T: DeserializeOwned,
  F: FnMut(&[T]) -> bool,
{
  let mut items: Vec<T> = Vec::new();
  let mut seen: HashSet<String> = HashSet::new();
  let mut req = first;
  let mut fetched = 0usize;

  loop {
    if fetched >= max_pages {
      return Err(RemoteError::PageLimit { limit: max_pages });
    }

    let url = req.full_url();

    if !seen.insert(url.clone()) {
      return Err(RemoteError::CyclicLink { url });
    }

    let page = source.get_page(&req)?;
    fetched += 1;

    let batch: Vec<T> = decode_items(&url, page.body)?;
    tracing::debug!(url = %url, items = batch.len(), has_next = page.next.is_some(), "fetched page");

    let proceed = keep_going(&batch);
    items.extend(batch);

    match page.next {
      Some(next) if proceed => req = PageRequest::new(next),
      _ => break,
    }
  }

  Ok(items)
}

/// Fetch every page until no continuation link remains.
pub fn fetch_all_pages<T>(source: &dyn PageSource, first: PageRequest, max_pages: usize) -> Result<Vec<T>, RemoteError>
where
  T: DeserializeOwned,
{
  fetch_pages_while(source, first, max_pages, |_| true)
}
