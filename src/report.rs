//! HTML report assembly.
//!
//! The document is streamed to the output file in row order: a style block,
//! one `<h3>` heading summarizing the comparison, then one table per
//! contiguous run of rows sharing a source directory. Grouping is
//! run-length over the input order, not a sort; a directory that reappears
//! later would open a fresh table.

use crate::correspond::{CompareInputs, CorrespondenceRow};
use crate::diff::{diff_artifact_path, DiffBackend};
use crate::error::{Error, Result, Warning};
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Component, Path, PathBuf};

/// Presentation knobs for the generated document.
#[derive(Debug, Clone)]
pub struct ReportOptions {
  pub output_path: PathBuf,
  /// Rendered `<img>` width in pixels.
  pub image_width: u32,
  /// Rendered `<img>` height in pixels.
  pub image_height: u32,
  /// Table cell padding in pixels.
  pub cell_padding: u32,
  /// Table border width in pixels; 0 draws no border.
  pub table_border: u32,
  /// Append file modification timestamps beneath file names.
  pub enable_timestamps: bool,
  /// Generate pixel-difference images alongside the renders.
  pub create_diffs: bool,
}

impl Default for ReportOptions {
  fn default() -> Self {
    Self {
      output_path: PathBuf::from("tests.html"),
      image_width: 256,
      image_height: 256,
      cell_padding: 0,
      table_border: 3,
      enable_timestamps: false,
      create_diffs: false,
    }
  }
}

/// Escape HTML entities for safe embedding.
pub fn escape_html(input: &str) -> String {
  input
    .replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
    .replace('\'', "&#39;")
}

/// Write the full report document to `options.output_path`, overwriting any
/// existing file.
///
/// Diff artifacts are generated per row through `differ` when
/// `options.create_diffs` is set; passing `None` while diffs were requested
/// degrades to a diff-less report with a single
/// [`Warning::CapabilityUnavailable`]. All warnings raised along the way
/// are returned so callers can log or inspect them; none of them aborts the
/// run.
pub fn write_report(
  rows: &[CorrespondenceRow],
  inputs: &CompareInputs,
  options: &ReportOptions,
  differ: Option<&dyn DiffBackend>,
) -> Result<Vec<Warning>> {
  let mut warnings = Vec::new();
  let differ = if options.create_diffs {
    if differ.is_none() {
      warnings.push(Warning::CapabilityUnavailable);
    }
    differ
  } else {
    None
  };

  let io_err = |source| Error::Io {
    path: options.output_path.clone(),
    source,
  };

  // Scoped writer: the handle closes on every path out of this function.
  let file = File::create(&options.output_path).map_err(io_err)?;
  let mut out = BufWriter::new(file);
  emit_document(&mut out, rows, inputs, options, differ, &mut warnings).map_err(io_err)?;
  out.flush().map_err(io_err)?;

  Ok(warnings)
}

fn emit_document(
  out: &mut impl Write,
  rows: &[CorrespondenceRow],
  inputs: &CompareInputs,
  options: &ReportOptions,
  differ: Option<&dyn DiffBackend>,
  warnings: &mut Vec<Warning>,
) -> io::Result<()> {
  let third_active = inputs.third_lang_active();

  out.write_all(b"<html>\n")?;
  out.write_all(b"<style>\n")?;
  write!(
    out,
    "td {{    padding: {};    border: {}px solid black;}}",
    options.cell_padding, options.table_border
  )?;
  out.write_all(
    b"table, tbody, th, .td_image {    border-collapse: collapse;    padding: 0;    margin: 0;}",
  )?;
  out.write_all(b"</style>")?;
  out.write_all(b"<body>\n")?;

  let dir1 = display_root(&inputs.source_root);
  let dir2 = display_root(&inputs.dest_root);
  if third_active {
    let dir3 = display_root(&inputs.dest2_root);
    writeln!(
      out,
      "<h3>{} (in: {}) vs {} (in: {}) vs {} (in: {})</h3>",
      escape_html(&inputs.source_lang),
      escape_html(&dir1),
      escape_html(&inputs.dest_lang),
      escape_html(&dir2),
      escape_html(inputs.dest_lang2.as_deref().unwrap_or_default()),
      escape_html(&dir3),
    )?;
  } else {
    writeln!(
      out,
      "<h3>{} (in: {}) vs {} (in: {})</h3>",
      escape_html(&inputs.source_lang),
      escape_html(&dir1),
      escape_html(&inputs.dest_lang),
      escape_html(&dir2),
    )?;
  }

  // Relative image URIs resolve against the document; an absolute output
  // path needs the file scheme instead.
  let file_uri = if options.output_path.is_absolute() {
    "file:///"
  } else {
    ""
  };

  let mut current_group: Option<&Path> = None;
  for row in rows {
    if current_group != Some(row.source.dir.as_path()) {
      if current_group.is_some() {
        out.write_all(b"</table>\n")?;
      }
      let label = normalize_lexically(&row.source.dir);
      writeln!(out, "<p>{}:</p>", escape_html(&label.display().to_string()))?;
      out.write_all(b"<table>\n")?;
      current_group = Some(row.source.dir.as_path());
    }

    let source_path = row.source.path();
    let dest_path = row.dest.as_ref().map(|d| d.path());
    let dest2_path = row.dest2.as_ref().map(|d| d.path());

    // Diff artifacts first; their cells reference the derived paths even
    // when generation reported a problem, matching the tolerance for
    // missing render files elsewhere in the report.
    let mut diff1 = None;
    let mut diff2 = None;
    let mut diff3 = None;
    if let (Some(dest), Some(backend)) = (&dest_path, differ) {
      let path = diff_artifact_path(&source_path, &inputs.source_lang, &inputs.dest_lang);
      warnings.extend(backend.create_diff(&source_path, dest, &path));
      diff1 = Some(path);
    }
    if third_active {
      if let (Some(dest2), Some(backend)) = (&dest2_path, differ) {
        let lang2 = inputs.dest_lang2.as_deref().unwrap_or_default();
        let path = diff_artifact_path(&source_path, &inputs.source_lang, lang2);
        warnings.extend(backend.create_diff(&source_path, dest2, &path));
        diff2 = Some(path);

        if let Some(dest) = &dest_path {
          let path = diff_artifact_path(&source_path, &inputs.dest_lang, lang2);
          warnings.extend(backend.create_diff(dest, dest2, &path));
          diff3 = Some(path);
        }
      }
    }

    out.write_all(b"<tr>\n")?;
    for path in [
      Some(&source_path),
      dest_path.as_ref(),
      dest2_path.as_ref(),
      diff1.as_ref(),
      diff2.as_ref(),
      diff3.as_ref(),
    ]
    .into_iter()
    .flatten()
    {
      image_cell(out, path, file_uri, options)?;
    }
    out.write_all(b"</tr>\n")?;

    out.write_all(b"<tr>\n")?;
    caption_cell(out, &source_path, &row.source.file_name, options)?;
    if let (Some(dest), Some(path)) = (&row.dest, &dest_path) {
      caption_cell(out, path, &dest.file_name, options)?;
    }
    if let (Some(dest2), Some(path)) = (&row.dest2, &dest2_path) {
      caption_cell(out, path, &dest2.file_name, options)?;
    }
    if diff1.is_some() {
      diff_caption_cell(out, &inputs.source_lang, &inputs.dest_lang)?;
    }
    let lang2 = inputs.dest_lang2.as_deref().unwrap_or_default();
    if diff2.is_some() {
      diff_caption_cell(out, &inputs.source_lang, lang2)?;
    }
    if diff3.is_some() {
      diff_caption_cell(out, &inputs.dest_lang, lang2)?;
    }
    out.write_all(b"</tr>\n")?;
  }

  // Closes the last open table; for an empty report this is the lone
  // unbalanced close the original emits, kept for byte compatibility.
  out.write_all(b"</table>\n")?;
  out.write_all(b"</body>\n")?;
  out.write_all(b"</html>\n")?;
  Ok(())
}

fn image_cell(
  out: &mut impl Write,
  path: &Path,
  file_uri: &str,
  options: &ReportOptions,
) -> io::Result<()> {
  writeln!(
    out,
    "<td class='td_image'><img src='{}{}' height='{}' width='{}' loading='lazy' style='background-color:black;'/></td>",
    file_uri,
    escape_html(&path.display().to_string()),
    options.image_height,
    options.image_width,
  )
}

fn caption_cell(
  out: &mut impl Write,
  path: &Path,
  file_name: &str,
  options: &ReportOptions,
) -> io::Result<()> {
  write!(out, "<td align='center'>{}", escape_html(file_name))?;
  if options.enable_timestamps && path.is_file() {
    write!(out, "<br>({})", format_mtime(path))?;
  }
  out.write_all(b"</td>\n")
}

fn diff_caption_cell(out: &mut impl Write, lang_a: &str, lang_b: &str) -> io::Result<()> {
  writeln!(
    out,
    "<td align='center'>Difference {} vs. {} </td>",
    escape_html(lang_a),
    escape_html(lang_b),
  )
}

/// Last-modified timestamp of `path` in local time, empty when unreadable.
fn format_mtime(path: &Path) -> String {
  fs::metadata(path)
    .and_then(|meta| meta.modified())
    .map(|mtime| {
      DateTime::<Local>::from(mtime)
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
    })
    .unwrap_or_default()
}

/// A root given as `.` reads better in the heading as the actual working
/// directory.
fn display_root(root: &Path) -> String {
  if root == Path::new(".") {
    std::env::current_dir()
      .map(|dir| dir.display().to_string())
      .unwrap_or_else(|_| ".".to_string())
  } else {
    root.display().to_string()
  }
}

/// Lexical path cleanup for group labels: drops `.` components and resolves
/// `..` against preceding normal components. No filesystem access.
fn normalize_lexically(path: &Path) -> PathBuf {
  let mut parts: Vec<Component> = Vec::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => match parts.last() {
        Some(Component::Normal(_)) => {
          parts.pop();
        }
        _ => parts.push(component),
      },
      other => parts.push(other),
    }
  }
  if parts.is_empty() {
    PathBuf::from(".")
  } else {
    parts.iter().collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn escapes_html_entities() {
    assert_eq!(escape_html("a&b<c>'d'"), "a&amp;b&lt;c&gt;&#39;d&#39;");
  }

  #[test]
  fn normalizes_paths_lexically() {
    assert_eq!(normalize_lexically(Path::new("./a/b")), Path::new("a/b"));
    assert_eq!(normalize_lexically(Path::new("a/./b/../c")), Path::new("a/c"));
    assert_eq!(normalize_lexically(Path::new(".")), Path::new("."));
  }

  #[test]
  fn named_root_displays_verbatim() {
    assert_eq!(display_root(Path::new("renders/out")), "renders/out");
  }

  #[test]
  fn dot_root_displays_as_working_directory() {
    let cwd = std::env::current_dir().unwrap();
    assert_eq!(display_root(Path::new(".")), cwd.display().to_string());
  }
}
