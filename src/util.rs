// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Output-file writing and man page rendering
// role: utilities/helpers
// inputs: Output target ("-" for stdout or a path); clap CommandFactory
// outputs: Files on disk or stdout text; man page text
// side_effects: write_output creates parent directories and writes files
// invariants:
// - write_output writes the whole text in one call, after it is fully produced
// errors: IO errors bubble with the target path in context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::CommandFactory;

/// Write UTF-8 `text` to `out`, or to stdout when `out` is "-".
/// Returns the written path for file targets.
pub fn write_output(out: &str, text: &str) -> Result<Option<PathBuf>> {
  if out == "-" {
    println!("{}", text);
    return Ok(None);
  }

  let path = PathBuf::from(out);

  if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent).with_context(|| format!("creating directory {}", parent.display()))?;
  }

  std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;

  Ok(Some(path))
}

pub fn read_input(path: &Path) -> Result<String> {
  std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
