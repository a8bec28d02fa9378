//! Pixel-difference image generation.

use crate::error::Warning;
use image::RgbImage;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// An injected image-diff capability.
///
/// Callers hold an `Option<&dyn DiffBackend>`; `None` models a run without
/// the capability, which degrades the report to plain side-by-side images.
pub trait DiffBackend {
  /// Write a pixel-difference image for `a` vs `b` at `out`.
  ///
  /// Never fails the run: any problem is reported as a [`Warning`] and any
  /// partial output is removed. A pre-existing file at `out` is removed
  /// before anything else so a failed regeneration cannot leave a stale
  /// artifact behind.
  fn create_diff(&self, a: &Path, b: &Path, out: &Path) -> Option<Warning>;
}

/// Diff backend built on the `image` crate: per-channel absolute difference
/// over a common RGB8 representation.
pub struct PixelDiffer;

impl DiffBackend for PixelDiffer {
  fn create_diff(&self, a: &Path, b: &Path, out: &Path) -> Option<Warning> {
    let _ = fs::remove_file(out);

    if !a.exists() {
      return Some(Warning::MissingInput {
        path: a.to_path_buf(),
      });
    }
    if !b.exists() {
      return Some(Warning::MissingInput {
        path: b.to_path_buf(),
      });
    }

    let result = absolute_difference(a, b).and_then(|diff| {
      diff
        .save(out)
        .map_err(|e| format!("failed to save {}: {e}", out.display()))
    });
    match result {
      Ok(()) => None,
      Err(reason) => {
        let _ = fs::remove_file(out);
        debug!("image diff error: {reason}");
        Some(Warning::DiffFailed {
          first: a.to_path_buf(),
          second: b.to_path_buf(),
        })
      }
    }
  }
}

fn absolute_difference(a: &Path, b: &Path) -> Result<RgbImage, String> {
  let img_a = image::open(a)
    .map_err(|e| format!("failed to open {}: {e}", a.display()))?
    .to_rgb8();
  let img_b = image::open(b)
    .map_err(|e| format!("failed to open {}: {e}", b.display()))?
    .to_rgb8();

  if img_a.dimensions() != img_b.dimensions() {
    return Err(format!(
      "dimension mismatch: {}x{} vs {}x{}",
      img_a.width(),
      img_a.height(),
      img_b.width(),
      img_b.height()
    ));
  }

  let mut diff = RgbImage::new(img_a.width(), img_a.height());
  for (out_px, (px_a, px_b)) in diff.pixels_mut().zip(img_a.pixels().zip(img_b.pixels())) {
    for channel in 0..3 {
      out_px[channel] = px_a[channel].abs_diff(px_b[channel]);
    }
  }
  Ok(diff)
}

/// Path of the diff artifact for `lang_a` vs `lang_b`, derived from the
/// source render path.
///
/// The original tool replaces the final 8 bytes of the path (`<tag>.png`
/// with the stock 4-character tags) with `_<lang_a>_vs_<lang_b>_diff.png`;
/// that fixed width is kept even for tags of other lengths.
pub fn diff_artifact_path(source_path: &Path, lang_a: &str, lang_b: &str) -> PathBuf {
  let rendered = source_path.to_string_lossy();
  let cut = rendered.len().saturating_sub(8);
  let stem = rendered.get(..cut).unwrap_or("");
  PathBuf::from(format!("{stem}_{lang_a}_vs_{lang_b}_diff.png"))
}
