use clap::Parser;
use log::warn;
use shader_compare::{
  find_source_renders, resolve_rows, write_report, CompareInputs, DiffBackend, PixelDiffer,
  ReportOptions,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "compare_renders",
  about = "Arrange per-language shader renders side by side in an HTML report"
)]
struct Args {
  /// Root directory of source-language renders
  #[arg(short = 'i', long, default_value = ".")]
  inputdir: PathBuf,

  /// Root directory of first destination-language renders
  #[arg(long, alias = "i2", default_value = ".")]
  inputdir2: PathBuf,

  /// Root directory of second destination-language renders
  #[arg(long, alias = "i3", default_value = ".")]
  inputdir3: PathBuf,

  /// Output HTML file
  #[arg(short = 'o', long, default_value = "tests.html")]
  outputfile: PathBuf,

  /// Generate pixel-difference images
  #[arg(short = 'd', long)]
  diff: bool,

  /// Write image modification timestamps beneath file names
  #[arg(short = 't', long)]
  timestamp: bool,

  /// Displayed image width in pixels
  #[arg(short = 'w', long, default_value_t = 256)]
  imagewidth: u32,

  /// Displayed image height in pixels
  #[arg(long, alias = "ht", default_value_t = 256)]
  imageheight: u32,

  /// Table cell padding in pixels
  #[arg(long, alias = "cp", default_value_t = 0)]
  cellpadding: u32,

  /// Table border width in pixels (0 = no border)
  #[arg(long, alias = "tb", default_value_t = 3)]
  tableborder: u32,

  /// Source language tag
  #[arg(long, alias = "sl", default_value = "glsl")]
  sourcelang: String,

  /// First destination language tag
  #[arg(long, alias = "dl", default_value = "osl")]
  destlang: String,

  /// Second destination language tag (empty disables the third column)
  #[arg(long, alias = "dl2", default_value = "")]
  destlang2: String,
}

fn main() {
  env_logger::init();
  if let Err(err) = run(Args::parse()) {
    eprintln!("error: {err}");
    std::process::exit(1);
  }
}

fn run(args: Args) -> shader_compare::Result<()> {
  let inputs = CompareInputs {
    source_root: args.inputdir.clone(),
    dest_root: args.inputdir2,
    dest2_root: args.inputdir3,
    source_lang: args.sourcelang,
    dest_lang: args.destlang,
    dest_lang2: (!args.destlang2.is_empty()).then_some(args.destlang2),
  };
  let options = ReportOptions {
    output_path: args.outputfile,
    image_width: args.imagewidth,
    image_height: args.imageheight,
    cell_padding: args.cellpadding,
    table_border: args.tableborder,
    enable_timestamps: args.timestamp,
    create_diffs: args.diff,
  };

  let sources = find_source_renders(&args.inputdir, &inputs.source_lang);
  let rows = resolve_rows(sources, &inputs);

  // The pixel differ is compiled in unconditionally, but the report layer
  // treats it as an optional capability; a build without it would pass
  // `None` here and the run degrades to a diff-less report.
  let differ = PixelDiffer;
  let backend: Option<&dyn DiffBackend> = args.diff.then_some(&differ as &dyn DiffBackend);

  let warnings = write_report(&rows, &inputs, &options, backend)?;
  for warning in &warnings {
    warn!("{warning}");
  }
  Ok(())
}
