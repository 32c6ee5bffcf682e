//! test-support: helpers for CLI tests that drive `repo-activity-digest` against canned API pages.
//!
//! Add as a dev-dependency in the top-level `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test_support = { path = "tests/support", features = ["serde"] }
//! ```
//!
//! Then in tests:
//! ```rust,ignore
//! let dir = test_support::tempdir();
//! let pages = test_support::write_page_fixtures(dir.path(), &serde_json::json!({}));
//! test_support::cmd_bin().env(test_support::PAGES_ENV, &pages);
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::{Path, PathBuf};

pub const BIN: &str = "repo-activity-digest";

/// Env var the binary reads to replace the HTTP page backend with a fixture file.
pub const PAGES_ENV: &str = "RAD_TEST_PAGES_FILE";

/// Env var the binary reads to replace the completion endpoint with a canned response.
pub const SUMMARY_ENV: &str = "RAD_TEST_SUMMARY_JSON";

/// Env var the binary reads to write outgoing mail as `.eml` files instead of using SMTP.
pub const MAIL_ENV: &str = "RAD_TEST_MAIL_DIR";

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn,test=info"))
            .unwrap();
        // with_test_writer() causes logs to appear alongside failing tests only
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Initialize insta snapshot settings once per test process.
///
/// - Centralizes snapshot files in `tests/snapshots` (relative to the test source directory)
/// - Omits `Expression:` in snapshot headers for cleaner diffs
pub fn init_insta() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let mut settings = insta::Settings::clone_current();
        settings.set_snapshot_path("../snapshots");
        settings.set_omit_expression(true);
        // Bind settings to the thread for the remainder of the test process by leaking the guard
        let guard = settings.bind_to_scope();
        std::mem::forget(guard);
    });
    Lazy::force(&INIT);
}

/// Create a temp directory that deletes on drop.
pub fn tempdir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create tempdir")
}

/// A ready-to-run command for the binary under test, with credentials scrubbed
/// so nothing can reach a real API by accident.
pub fn cmd_bin() -> assert_cmd::Command {
    init_tracing();
    let mut cmd = assert_cmd::Command::cargo_bin(BIN).expect("binary target not found");
    cmd.env_remove("GITHUB_TOKEN")
        .env_remove("GH_TOKEN")
        .env_remove("OPENAI_API_KEY")
        .env_remove("SMTP_PASSWORD")
        .env_remove("GITHUB_REPOSITORY")
        .env_remove(PAGES_ENV)
        .env_remove(SUMMARY_ENV)
        .env_remove(MAIL_ENV);
    cmd
}

/// Write a page fixture map (URL -> {status, body, next}) into `dir` and return its path.
#[cfg(feature = "serde")]
pub fn write_page_fixtures(dir: &Path, pages: &serde_json::Value) -> PathBuf {
    let path = dir.join("pages.json");
    let text = serde_json::to_string_pretty(pages).expect("serialize fixtures");
    std::fs::write(&path, text)
        .unwrap_or_else(|e| panic!("failed to write fixtures {}: {e}", path.display()));
    path
}

/// One page entry for a fixture map.
#[cfg(feature = "serde")]
pub fn page(body: serde_json::Value, next: Option<&str>) -> serde_json::Value {
    serde_json::json!({ "status": 200, "body": body, "next": next })
}

/// A failing page entry for a fixture map.
#[cfg(feature = "serde")]
pub fn failing_page(status: u16, body: &str) -> serde_json::Value {
    serde_json::json!({ "status": status, "body": body })
}

/// Read a UTF-8 output file produced by the binary.
pub fn read_text(path: &Path) -> String {
    std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}
