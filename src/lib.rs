//! Side-by-side HTML comparison reports for shader-translation render
//! outputs.
//!
//! Given up to three directories of rendered test-case images, one per
//! shading language, the crate matches corresponding files by suffix
//! substitution (`*_glsl.png` to `*_osl.png`), optionally generates
//! pixel-difference images, and writes a single static HTML document
//! arranging each triplet side by side.
//!
//! The pipeline is three calls:
//! [`find_source_renders`], then [`resolve_rows`], then [`write_report`].

pub mod correspond;
pub mod diff;
pub mod discovery;
pub mod error;
pub mod report;

pub use correspond::{resolve_rows, CompareInputs, CorrespondenceRow, RenderRef};
pub use diff::{diff_artifact_path, DiffBackend, PixelDiffer};
pub use discovery::{find_source_renders, SourceEntry};
pub use error::{Error, Result, Warning};
pub use report::{write_report, ReportOptions};
