use predicates::prelude::*;

fn eml_files(dir: &std::path::Path) -> Vec<std::path::PathBuf> {
  std::fs::read_dir(dir)
    .unwrap()
    .map(|e| e.unwrap().path())
    .filter(|p| p.extension().map(|x| x == "eml").unwrap_or(false))
    .collect()
}

#[test]
fn notify_writes_one_message_with_summary_body() {
  let dir = test_support::tempdir();
  let body = dir.path().join("weekly_summary.txt");
  let outbox = dir.path().join("outbox");
  std::fs::write(&body, "Pagination helper landed; no open risks.").unwrap();

  test_support::cmd_bin()
    .env(test_support::MAIL_ENV, &outbox)
    .args([
      "notify",
      "--to",
      "lead@example.com",
      "--from",
      "bot@example.com",
      "--body-file",
      body.to_str().unwrap(),
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Sent \"Weekly Summary\" to lead@example.com"));

  let files = eml_files(&outbox);
  assert_eq!(files.len(), 1);

  let raw = test_support::read_text(&files[0]);
  assert!(raw.contains("Subject: Weekly Summary"));
  assert!(raw.contains("To: lead@example.com"));
  assert!(raw.contains("Pagination helper landed; no open risks."));
}

#[test]
fn notify_rejects_malformed_sender_before_sending() {
  let dir = test_support::tempdir();
  let body = dir.path().join("weekly_summary.txt");
  let outbox = dir.path().join("outbox");
  std::fs::write(&body, "summary").unwrap();

  test_support::cmd_bin()
    .env(test_support::MAIL_ENV, &outbox)
    .args(["notify", "--to", "lead@example.com", "--from", "not an address", "--body-file", body.to_str().unwrap()])
    .assert()
    .failure()
    .stderr(predicate::str::contains("invalid sender address"));

  assert!(!outbox.exists() || eml_files(&outbox).is_empty());
}

#[test]
fn notify_requires_password_without_fixture_dir() {
  let dir = test_support::tempdir();
  let body = dir.path().join("weekly_summary.txt");
  std::fs::write(&body, "summary").unwrap();

  test_support::cmd_bin()
    .args(["notify", "--to", "lead@example.com", "--from", "bot@example.com", "--body-file", body.to_str().unwrap()])
    .assert()
    .failure()
    .stderr(predicate::str::contains("SMTP_PASSWORD"));
}
