//! Derives destination-language counterparts for discovered source renders.

use crate::discovery::SourceEntry;
use std::path::PathBuf;

/// The roots and language tags a comparison runs over.
#[derive(Debug, Clone)]
pub struct CompareInputs {
  pub source_root: PathBuf,
  pub dest_root: PathBuf,
  pub dest2_root: PathBuf,
  pub source_lang: String,
  pub dest_lang: String,
  /// Second destination language; `None` disables the third column.
  pub dest_lang2: Option<String>,
}

impl CompareInputs {
  /// True when a second destination language takes part in the comparison.
  ///
  /// Mirrors the dest-1 rule: the third column is dropped when it would
  /// repeat the source column exactly (same root and same language).
  pub fn third_lang_active(&self) -> bool {
    match &self.dest_lang2 {
      Some(lang) => self.source_root != self.dest2_root || self.source_lang != *lang,
      None => false,
    }
  }
}

/// A derived counterpart render. The file may not exist on disk; the report
/// references it regardless and the viewer shows a broken image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRef {
  pub file_name: String,
  pub dir: PathBuf,
}

impl RenderRef {
  /// Full path of the referenced render.
  pub fn path(&self) -> PathBuf {
    self.dir.join(&self.file_name)
  }
}

/// One report row: a source render and its derived counterparts.
#[derive(Debug, Clone)]
pub struct CorrespondenceRow {
  pub source: SourceEntry,
  pub dest: Option<RenderRef>,
  pub dest2: Option<RenderRef>,
}

/// Replace the trailing `<from_lang>.png` of `file_name` with
/// `<to_lang>.png`.
///
/// The cut point is fixed length arithmetic on the known suffix, not a
/// substring search, so language tags that are substrings of each other
/// derive correctly. Returns `None` when the name is too short to carry the
/// suffix.
fn substitute_lang(file_name: &str, from_lang: &str, to_lang: &str) -> Option<String> {
  let suffix_len = from_lang.len() + ".png".len();
  let stem_len = file_name.len().checked_sub(suffix_len)?;
  let stem = file_name.get(..stem_len)?;
  Some(format!("{stem}{to_lang}.png"))
}

/// Compute the destination counterpart(s) for every source entry.
///
/// A destination is absent when its root and language both equal the
/// source's, which would compare a render against itself.
pub fn resolve_rows(sources: Vec<SourceEntry>, inputs: &CompareInputs) -> Vec<CorrespondenceRow> {
  let dest_active = inputs.source_root != inputs.dest_root || inputs.source_lang != inputs.dest_lang;
  let third_active = inputs.third_lang_active();

  sources
    .into_iter()
    .map(|source| {
      // Subdirectory of the render relative to the source root; destination
      // renders live under the same subdirectory of their own root.
      let subdir = source
        .dir
        .strip_prefix(&inputs.source_root)
        .unwrap_or(&source.dir)
        .to_path_buf();

      let dest = if dest_active {
        substitute_lang(&source.file_name, &inputs.source_lang, &inputs.dest_lang).map(
          |file_name| RenderRef {
            file_name,
            dir: inputs.dest_root.join(&subdir),
          },
        )
      } else {
        None
      };

      let dest2 = if third_active {
        inputs.dest_lang2.as_deref().and_then(|lang2| {
          substitute_lang(&source.file_name, &inputs.source_lang, lang2).map(|file_name| {
            RenderRef {
              file_name,
              // The original tool joins the second destination from the
              // first destination root, not the third. Kept as-is; the
              // report tolerates the resulting missing files.
              dir: inputs.dest_root.join(&subdir),
            }
          })
        })
      } else {
        None
      };

      CorrespondenceRow {
        source,
        dest,
        dest2,
      }
    })
    .collect()
}
