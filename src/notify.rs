// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Mail the weekly summary to one recipient over a STARTTLS-secured SMTP submission session
// role: notifier/collaborator
// inputs: NotifierConfig; subject; body text; env SMTP_PASSWORD; env RAD_TEST_MAIL_DIR for fixtures
// outputs: One plain-text message handed to the transport
// side_effects: SMTP session with the configured relay (login + one message), or a .eml file (fixture backend)
// invariants:
// - Addresses are validated before any connection is opened
// - Exactly one message per invocation; no retry
// errors: Address/build errors and transport failures, surfaced through anyhow with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use anyhow::{Context, Result, bail};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{FileTransport, Message, SmtpTransport, Transport};

use crate::config::NotifierConfig;

/// Env var naming a directory that receives `.eml` files instead of an SMTP session.
pub const FIXTURE_ENV: &str = "RAD_TEST_MAIL_DIR";

// --- Trait seam for the mail transport ---
pub trait MailTransport {
  fn deliver(&self, message: &Message) -> Result<()>;
}

impl MailTransport for SmtpTransport {
  fn deliver(&self, message: &Message) -> Result<()> {
    self.send(message).context("sending mail over SMTP")?;
    Ok(())
  }
}

impl MailTransport for FileTransport {
  fn deliver(&self, message: &Message) -> Result<()> {
    self.send(message).context("writing mail to fixture directory")?;
    Ok(())
  }
}

pub fn env_wants_fixture() -> bool {
  std::env::var(FIXTURE_ENV).map(|v| !v.trim().is_empty()).unwrap_or(false)
}

/// Fixture directory when requested via env, otherwise an authenticated STARTTLS relay.
pub fn build_transport(cfg: &NotifierConfig) -> Result<Box<dyn MailTransport>> {
  if env_wants_fixture() {
    let dir = std::env::var(FIXTURE_ENV)?;
    std::fs::create_dir_all(&dir).with_context(|| format!("creating mail fixture dir {}", dir))?;
    return Ok(Box::new(FileTransport::new(Path::new(&dir))));
  }

  let Some(password) = cfg.credential.clone() else {
    bail!("Missing SMTP password. Set SMTP_PASSWORD");
  };

  let transport = SmtpTransport::starttls_relay(&cfg.smtp_host)
    .with_context(|| format!("configuring STARTTLS relay {}", cfg.smtp_host))?
    .port(cfg.smtp_port)
    .credentials(Credentials::new(cfg.from.clone(), password))
    .timeout(Some(cfg.timeout))
    .build();

  Ok(Box::new(transport))
}

pub fn build_message(cfg: &NotifierConfig, subject: &str, body: &str) -> Result<Message> {
  let from: Mailbox = cfg.from.parse().with_context(|| format!("invalid sender address '{}'", cfg.from))?;
  let to: Mailbox = cfg.to.parse().with_context(|| format!("invalid recipient address '{}'", cfg.to))?;

  let message = Message::builder()
    .from(from)
    .to(to)
    .subject(subject)
    .header(ContentType::TEXT_PLAIN)
    .body(body.to_string())
    .context("building mail message")?;

  Ok(message)
}

pub fn send_summary(cfg: &NotifierConfig, transport: &dyn MailTransport, subject: &str, body: &str) -> Result<()> {
  let message = build_message(cfg, subject, body)?;

  tracing::info!(to = %cfg.to, relay = %cfg.smtp_host, port = cfg.smtp_port, "sending summary mail");
  transport.deliver(&message)
}
