//! Error and warning types for shader-compare.
//!
//! The tool is deliberately forgiving: a missing render or a failed diff is
//! surfaced as a warning and the run continues. The only fatal condition is
//! failing to write the report itself.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
  /// The report file could not be created or written.
  #[error("failed to write report {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Non-fatal conditions collected while assembling a report.
///
/// Each variant's `Display` output is the log line emitted for it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Warning {
  /// An input to a diff pairing does not exist on disk.
  #[error("image diff input missing: {}", path.display())]
  MissingInput { path: PathBuf },

  /// Decoding, differencing, or encoding a diff image failed.
  #[error("failed to create image diff between {} and {}", first.display(), second.display())]
  DiffFailed { first: PathBuf, second: PathBuf },

  /// Diffing was requested but no diff backend is available.
  #[error("--diff ignored: image diff backend not available")]
  CapabilityUnavailable,
}
