use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod collector;
mod config;
mod error;
mod ext;
mod github;
mod model;
mod notify;
mod render;
mod summarize;
mod util;
mod window;

use crate::cli::{Cli, Command, normalize_collect, normalize_notify, normalize_summarize};

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  // stderr keeps stdout clean for `--out -`
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .try_init();
}

fn run_collect(args: cli::CollectArgs) -> Result<()> {
  let eff = normalize_collect(args)?;
  let source = github::api::build_source(&eff.config)?;

  let report = collector::collect(&eff.config, source.as_ref())?;
  let text = render::render_report(&report);

  if let Some(path) = util::write_output(&eff.out, &text)? {
    tracing::info!(path = %path.display(), "wrote activity report");
  }

  Ok(())
}

fn run_summarize(args: cli::SummarizeArgs) -> Result<()> {
  let eff = normalize_summarize(args)?;
  let activity = util::read_input(&eff.input)?;
  let api = summarize::build_api(&eff.config)?;

  let summary = summarize::summarize(&eff.config, api.as_ref(), &activity)?;

  println!("--- AI Weekly Summary ---");
  println!("{}", summary);

  if eff.out != "-" {
    util::write_output(&eff.out, &summary)?;
  }

  Ok(())
}

fn run_notify(args: cli::NotifyArgs) -> Result<()> {
  let eff = normalize_notify(args)?;
  let body = util::read_input(&eff.body_file)?;
  let transport = notify::build_transport(&eff.config)?;

  notify::send_summary(&eff.config, transport.as_ref(), &eff.subject, &body)?;
  println!("Sent \"{}\" to {}", eff.subject, eff.config.to);

  Ok(())
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  init_tracing();

  match cli.command {
    Some(Command::Collect(args)) => run_collect(args),
    Some(Command::Summarize(args)) => run_summarize(args),
    Some(Command::Notify(args)) => run_notify(args),
    None => bail!("Provide a subcommand: collect | summarize | notify"),
  }
}
