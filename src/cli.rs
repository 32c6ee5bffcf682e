use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};

use crate::config::{self, CollectorConfig, NotifierConfig, SummarizerConfig};
use crate::github::api::env_wants_fixture;
use crate::window::{parse_instant, resolve_window};

#[derive(Parser, Debug)]
#[command(
    name = "repo-activity-digest",
    version,
    about = "Collect a week of GitHub activity into a text report and summarize it",
    long_about = None
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Option<Command>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Fetch commits, pull requests and issues for a window and write the activity report
  Collect(CollectArgs),
  /// Summarize a previously written activity report with a language model
  Summarize(SummarizeArgs),
  /// Mail a summary file to one recipient over STARTTLS SMTP (password from $SMTP_PASSWORD)
  Notify(NotifyArgs),
}

#[derive(Args, Debug)]
pub struct CollectArgs {
  /// Repository as owner/name (default: $GITHUB_REPOSITORY)
  #[arg(long)]
  pub repo: Option<String>,

  /// Window start, RFC3339 or YYYY-MM-DD (UTC); must be paired with --until
  #[arg(long, alias = "start")]
  pub since: Option<String>,

  /// Window end (exclusive); must be paired with --since
  #[arg(long, alias = "end")]
  pub until: Option<String>,

  /// Items requested per page (1-100)
  #[arg(long, default_value_t = config::DEFAULT_PAGE_SIZE)]
  pub page_size: u32,

  /// Abort when an endpoint needs more pages than this
  #[arg(long, default_value_t = config::DEFAULT_MAX_PAGES)]
  pub max_pages: usize,

  /// Base URL of the REST API
  #[arg(long, default_value = config::DEFAULT_GITHUB_API)]
  pub api_url: String,

  /// Per-request timeout in seconds
  #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
  pub timeout_secs: u64,

  /// Output file ("-" for stdout)
  #[arg(long, default_value = "activity.txt")]
  pub out: String,

  /// Override the "now" instant used for the default window (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Args, Debug)]
pub struct SummarizeArgs {
  /// Activity report produced by `collect`
  #[arg(long, default_value = "activity.txt")]
  pub input: PathBuf,

  /// Repository as owner/name, named in the prompt (default: $GITHUB_REPOSITORY)
  #[arg(long)]
  pub repo: Option<String>,

  #[arg(long, default_value = "gpt-4o-mini")]
  pub model: String,

  /// Upper word-count target for the summary
  #[arg(long, default_value_t = 140)]
  pub max_words: u32,

  #[arg(long, default_value_t = 0.3)]
  pub temperature: f32,

  /// Base URL of the completion API
  #[arg(long, default_value = config::DEFAULT_COMPLETIONS_API)]
  pub api_url: String,

  /// Per-request timeout in seconds
  #[arg(long, default_value_t = 120)]
  pub timeout_secs: u64,

  /// Output file ("-" for stdout only)
  #[arg(long, default_value = "weekly_summary.txt")]
  pub out: String,
}

#[derive(Args, Debug)]
pub struct NotifyArgs {
  /// Recipient address
  #[arg(long)]
  pub to: String,

  /// Sender address, also used as the SMTP login
  #[arg(long)]
  pub from: String,

  #[arg(long, default_value = "Weekly Summary")]
  pub subject: String,

  /// File whose contents become the message body
  #[arg(long, default_value = "weekly_summary.txt")]
  pub body_file: PathBuf,

  /// SMTP submission host (STARTTLS)
  #[arg(long, default_value = config::DEFAULT_SMTP_HOST)]
  pub smtp_host: String,

  #[arg(long, default_value_t = config::DEFAULT_SMTP_PORT)]
  pub smtp_port: u16,

  /// Session timeout in seconds
  #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
  pub timeout_secs: u64,
}

#[derive(Debug)]
pub struct EffectiveCollect {
  pub config: CollectorConfig,
  pub out: String,
}

#[derive(Debug)]
pub struct EffectiveSummarize {
  pub config: SummarizerConfig,
  pub input: PathBuf,
  pub out: String,
}

#[derive(Debug)]
pub struct EffectiveNotify {
  pub config: NotifierConfig,
  pub subject: String,
  pub body_file: PathBuf,
}

fn resolve_repository(flag: Option<String>) -> Result<String> {
  let repo = flag.or_else(config::repository_from_env).unwrap_or_default();
  config::validate_repository(&repo)?;
  Ok(repo)
}

pub fn normalize_collect(args: CollectArgs) -> Result<EffectiveCollect> {
  let repository = resolve_repository(args.repo)?;

  let now = args.now_override.as_deref().map(parse_instant).transpose()?;
  let window = resolve_window(args.since.as_deref(), args.until.as_deref(), now)?;

  // Token discovery is skipped when canned pages stand in for the API.
  let credential = if env_wants_fixture() {
    None
  } else {
    match config::discover_github_token() {
      Some(t) => Some(t),
      None => bail!("Missing token. Set GITHUB_TOKEN or run: gh auth login"),
    }
  };

  let mut config = CollectorConfig::new(&repository, window, credential);
  config.page_size = args.page_size;
  config.max_pages = args.max_pages;
  config.endpoint_base_url = args.api_url;
  config.timeout = Duration::from_secs(args.timeout_secs);
  config.validate()?;

  Ok(EffectiveCollect { config, out: args.out })
}

pub fn normalize_summarize(args: SummarizeArgs) -> Result<EffectiveSummarize> {
  let repository = resolve_repository(args.repo)?;

  if args.max_words == 0 {
    bail!("--max-words must be at least 1");
  }
  if !(0.0..=2.0).contains(&args.temperature) {
    bail!("--temperature must be between 0 and 2 (got {})", args.temperature);
  }

  let config = SummarizerConfig {
    repository,
    model: args.model,
    max_words: args.max_words,
    temperature: args.temperature,
    endpoint_base_url: args.api_url,
    credential: config::discover_completions_key(),
    timeout: Duration::from_secs(args.timeout_secs),
  };

  Ok(EffectiveSummarize {
    config,
    input: args.input,
    out: args.out,
  })
}

pub fn normalize_notify(args: NotifyArgs) -> Result<EffectiveNotify> {
  if args.to.trim().is_empty() || args.from.trim().is_empty() {
    bail!("--to and --from must be non-empty");
  }
  if args.subject.trim().is_empty() {
    bail!("--subject must be non-empty");
  }

  // The password is only needed for a real SMTP session.
  let credential = if crate::notify::env_wants_fixture() {
    None
  } else {
    match config::discover_smtp_password() {
      Some(p) => Some(p),
      None => bail!("Missing SMTP password. Set SMTP_PASSWORD"),
    }
  };

  let config = NotifierConfig {
    to: args.to.trim().to_string(),
    from: args.from.trim().to_string(),
    smtp_host: args.smtp_host,
    smtp_port: args.smtp_port,
    credential,
    timeout: Duration::from_secs(args.timeout_secs),
  };

  Ok(EffectiveNotify {
    config,
    subject: args.subject,
    body_file: args.body_file,
  })
}
