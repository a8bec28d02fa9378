//! Source render discovery.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A render found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
  /// Bare file name, ending in `<source_lang>.png`.
  pub file_name: String,
  /// Directory containing the file, as walked (starts with the source root).
  pub dir: PathBuf,
}

impl SourceEntry {
  /// Full path of the render.
  pub fn path(&self) -> PathBuf {
    self.dir.join(&self.file_name)
  }
}

/// Recursively collect every file named `*<source_lang>.png` under `root`.
///
/// Each directory yields its files (name-sorted) before descending into its
/// subdirectories, so all renders of one directory stay contiguous in the
/// result. The report's run-length grouping depends on that order.
///
/// A missing or empty root yields no entries; unreadable entries are
/// skipped.
pub fn find_source_renders(root: &Path, source_lang: &str) -> Vec<SourceEntry> {
  let suffix = format!("{source_lang}.png");
  let mut sources = Vec::new();
  let walker = WalkDir::new(root).sort_by(|a, b| {
    (a.file_type().is_dir(), a.file_name()).cmp(&(b.file_type().is_dir(), b.file_name()))
  });
  for entry in walker {
    let Ok(entry) = entry else { continue };
    if !entry.file_type().is_file() {
      continue;
    }
    let Some(name) = entry.file_name().to_str() else {
      continue;
    };
    if !name.ends_with(&suffix) {
      continue;
    }
    let dir = entry.path().parent().unwrap_or(root).to_path_buf();
    sources.push(SourceEntry {
      file_name: name.to_string(),
      dir,
    });
  }
  sources
}
