use image::{Rgb, RgbImage};
use shader_compare::{
  find_source_renders, resolve_rows, write_report, CompareInputs, DiffBackend, PixelDiffer,
  ReportOptions, Warning,
};
use std::fs;
use std::path::{Path, PathBuf};

fn write_png(path: &Path, color: [u8; 3]) {
  RgbImage::from_pixel(4, 4, Rgb(color)).save(path).unwrap();
}

fn inputs(root: &Path, source_lang: &str, dest_lang: &str) -> CompareInputs {
  CompareInputs {
    source_root: root.to_path_buf(),
    dest_root: root.to_path_buf(),
    dest2_root: root.to_path_buf(),
    source_lang: source_lang.to_string(),
    dest_lang: dest_lang.to_string(),
    dest_lang2: None,
  }
}

fn options(output_path: PathBuf) -> ReportOptions {
  ReportOptions {
    output_path,
    ..ReportOptions::default()
  }
}

fn generate(inputs: &CompareInputs, options: &ReportOptions) -> (String, Vec<Warning>) {
  let sources = find_source_renders(&inputs.source_root, &inputs.source_lang);
  let rows = resolve_rows(sources, inputs);
  let backend: Option<&dyn DiffBackend> = if options.create_diffs {
    Some(&PixelDiffer)
  } else {
    None
  };
  let warnings = write_report(&rows, inputs, options, backend).unwrap();
  let html = fs::read_to_string(&options.output_path).unwrap();
  (html, warnings)
}

#[test]
fn empty_input_still_produces_closed_document() {
  let dir = tempfile::tempdir().unwrap();
  let cfg = inputs(dir.path(), "glsl", "osl");
  let opts = options(dir.path().join("tests.html"));

  let (html, warnings) = generate(&cfg, &opts);
  assert!(warnings.is_empty());
  assert!(html.starts_with("<html>\n"));
  assert!(html.contains("<h3>glsl (in: "));
  assert!(html.ends_with("</table>\n</body>\n</html>\n"));
  // No rows, so no group labels or image cells.
  assert!(!html.contains("<p>"));
  assert!(!html.contains("class='td_image'"));
}

#[test]
fn two_language_report_lists_source_and_derived_destination() {
  let dir = tempfile::tempdir().unwrap();
  write_png(&dir.path().join("foo_glsl.png"), [10, 20, 30]);
  write_png(&dir.path().join("foo_osl.png"), [10, 20, 30]);

  let cfg = inputs(dir.path(), "glsl", "osl");
  let opts = options(dir.path().join("tests.html"));
  let (html, warnings) = generate(&cfg, &opts);

  assert!(warnings.is_empty());
  let heading = format!(
    "<h3>glsl (in: {root}) vs osl (in: {root})</h3>",
    root = dir.path().display()
  );
  assert!(html.contains(&heading));
  assert!(html.contains("<td align='center'>foo_glsl.png</td>"));
  assert!(html.contains("<td align='center'>foo_osl.png</td>"));
  assert_eq!(html.matches("class='td_image'").count(), 2);
  // Output path is absolute, so image URIs carry the file scheme.
  assert!(html.contains("src='file:///"));
}

#[test]
fn identical_source_and_destination_collapse_to_one_column() {
  let dir = tempfile::tempdir().unwrap();
  write_png(&dir.path().join("foo_glsl.png"), [10, 20, 30]);

  let cfg = inputs(dir.path(), "glsl", "glsl");
  let opts = options(dir.path().join("tests.html"));
  let (html, _) = generate(&cfg, &opts);

  assert_eq!(html.matches("class='td_image'").count(), 1);
  assert!(!html.contains("Difference"));
}

#[test]
fn tables_group_contiguous_directory_runs() {
  let dir = tempfile::tempdir().unwrap();
  fs::create_dir(dir.path().join("unit")).unwrap();
  write_png(&dir.path().join("top_glsl.png"), [0, 0, 0]);
  write_png(&dir.path().join("unit").join("deep_glsl.png"), [0, 0, 0]);

  let cfg = inputs(dir.path(), "glsl", "osl");
  let opts = options(dir.path().join("tests.html"));
  let (html, _) = generate(&cfg, &opts);

  assert_eq!(html.matches("<p>").count(), 2);
  assert_eq!(html.matches("<table>\n").count(), 2);
  assert_eq!(html.matches("</table>\n").count(), 2);
  let unit_label = format!("<p>{}:</p>", dir.path().join("unit").display());
  assert!(html.contains(&unit_label));
  // Root-level rows precede subdirectory rows.
  let top = html.find("top_glsl.png").unwrap();
  let deep = html.find("deep_glsl.png").unwrap();
  assert!(top < deep);
}

#[test]
fn three_languages_with_missing_renders_warn_per_pairing() {
  let dir = tempfile::tempdir().unwrap();
  write_png(&dir.path().join("bar_glsl.png"), [50, 50, 50]);

  let mut cfg = inputs(dir.path(), "glsl", "osl");
  cfg.dest_lang2 = Some("mdl".to_string());
  let mut opts = options(dir.path().join("tests.html"));
  opts.create_diffs = true;
  let (html, warnings) = generate(&cfg, &opts);

  let osl = dir.path().join("bar_osl.png");
  let mdl = dir.path().join("bar_mdl.png");
  assert_eq!(
    warnings,
    vec![
      Warning::MissingInput { path: osl.clone() },
      Warning::MissingInput { path: mdl },
      Warning::MissingInput { path: osl },
    ]
  );

  // Destination and diff cells still render, pointing at absent files.
  assert_eq!(html.matches("class='td_image'").count(), 6);
  assert!(html.contains("Difference glsl vs. osl "));
  assert!(html.contains("Difference glsl vs. mdl "));
  assert!(html.contains("Difference osl vs. mdl "));
  assert!(!dir.path().join("bar__glsl_vs_osl_diff.png").exists());
}

#[test]
fn diffing_writes_artifacts_next_to_sources() {
  let dir = tempfile::tempdir().unwrap();
  write_png(&dir.path().join("foo_glsl.png"), [200, 0, 0]);
  write_png(&dir.path().join("foo_osl.png"), [180, 0, 0]);

  let cfg = inputs(dir.path(), "glsl", "osl");
  let mut opts = options(dir.path().join("tests.html"));
  opts.create_diffs = true;
  let (html, warnings) = generate(&cfg, &opts);

  assert!(warnings.is_empty());
  let artifact = dir.path().join("foo__glsl_vs_osl_diff.png");
  assert!(artifact.exists());
  assert!(fs::metadata(&artifact).unwrap().len() > 0);
  let diff = image::open(&artifact).unwrap().to_rgb8();
  assert_eq!(diff.get_pixel(0, 0), &Rgb([20, 0, 0]));
  assert!(html.contains("Difference glsl vs. osl "));
  assert_eq!(html.matches("class='td_image'").count(), 3);
}

#[test]
fn requested_diffs_without_backend_warn_once_and_degrade() {
  let dir = tempfile::tempdir().unwrap();
  write_png(&dir.path().join("foo_glsl.png"), [1, 2, 3]);
  write_png(&dir.path().join("foo_osl.png"), [1, 2, 3]);

  let cfg = inputs(dir.path(), "glsl", "osl");
  let mut opts = options(dir.path().join("tests.html"));
  opts.create_diffs = true;

  let sources = find_source_renders(&cfg.source_root, &cfg.source_lang);
  let rows = resolve_rows(sources, &cfg);
  let warnings = write_report(&rows, &cfg, &opts, None).unwrap();
  assert_eq!(warnings, vec![Warning::CapabilityUnavailable]);

  let html = fs::read_to_string(&opts.output_path).unwrap();
  assert!(!html.contains("Difference"));
  assert_eq!(html.matches("class='td_image'").count(), 2);
}

#[test]
fn timestamps_appear_only_for_files_on_disk() {
  let dir = tempfile::tempdir().unwrap();
  write_png(&dir.path().join("foo_glsl.png"), [1, 2, 3]);
  // foo_osl.png is derived but never written.

  let cfg = inputs(dir.path(), "glsl", "osl");
  let mut opts = options(dir.path().join("tests.html"));
  opts.enable_timestamps = true;
  let (html, _) = generate(&cfg, &opts);

  assert!(html.contains("foo_glsl.png<br>("));
  // The derived destination does not exist, so its caption has no stamp.
  assert!(html.contains("<td align='center'>foo_osl.png</td>"));
}

#[test]
fn file_names_are_html_escaped() {
  let dir = tempfile::tempdir().unwrap();
  write_png(&dir.path().join("a&b_glsl.png"), [1, 2, 3]);

  let cfg = inputs(dir.path(), "glsl", "osl");
  let opts = options(dir.path().join("tests.html"));
  let (html, _) = generate(&cfg, &opts);

  assert!(html.contains("a&amp;b_glsl.png"));
  assert!(!html.contains("a&b_glsl.png"));
}
