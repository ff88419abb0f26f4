use png_texture::{png::*, *};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn, LevelFilter, Log, Metadata, Record};
use walkdir::WalkDir;

/// Decodes PNG files and reports what was found.
#[derive(Parser)]
#[command(about = "Decode PNG files into RGBA8 pixels and report the results.")]
struct Args {
  /// Files to decode. Directories are searched for `.png` files.
  #[arg(required = true)]
  paths: Vec<PathBuf>,

  /// More output (repeatable).
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,

  /// List every chunk of each file.
  #[arg(long)]
  chunks: bool,

  /// Fail on any chunk with a bad CRC.
  #[arg(long)]
  verify_crc: bool,

  /// Fail if a file has no IEND chunk.
  #[arg(long)]
  require_iend: bool,

  /// Flip each decoded image to bottom-up row order.
  #[arg(long)]
  flip: bool,
}

/// Writes log lines to stderr.
struct StderrLogger;
impl Log for StderrLogger {
  fn enabled(&self, metadata: &Metadata) -> bool {
    metadata.level() <= log::max_level()
  }
  fn log(&self, record: &Record) {
    if self.enabled(record.metadata()) {
      eprintln!("[{}] {}", record.level(), record.args());
    }
  }
  fn flush(&self) {}
}
static LOGGER: StderrLogger = StderrLogger;

fn main() -> Result<()> {
  let args = Args::parse();

  log::set_logger(&LOGGER).map_err(|e| anyhow::anyhow!("{e}"))?;
  log::set_max_level(level_filter(args.verbose, args.chunks));

  let config = PngDecodeConfig::new()
    .with_verify_crc(args.verify_crc)
    .with_require_iend(args.require_iend);

  let mut failures = 0_usize;
  let mut total = 0_usize;
  for path in &args.paths {
    for entry in WalkDir::new(path).follow_links(true) {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          warn!("{e}");
          continue;
        }
      };
      let p = entry.path();
      if !entry.file_type().is_file() {
        continue;
      }
      // files named directly are always tried
      let is_png = p.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("png"));
      if entry.depth() > 0 && !is_png {
        continue;
      }
      total += 1;
      if let Err(e) = process_file(p, &config, &args) {
        error!("{}: {e:#}", p.display());
        failures += 1;
      }
    }
  }

  info!("decoded {} of {total} files", total - failures);
  if failures > 0 {
    anyhow::bail!("{failures} of {total} files failed to decode");
  }
  Ok(())
}

/// `-v` steps up from warnings. Asking for `--chunks` implies at least info.
fn level_filter(verbose: u8, chunks: bool) -> LevelFilter {
  let level = match verbose {
    0 => LevelFilter::Warn,
    1 => LevelFilter::Info,
    2 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  if chunks {
    level.max(LevelFilter::Info)
  } else {
    level
  }
}

fn process_file(path: &Path, config: &PngDecodeConfig, args: &Args) -> Result<()> {
  let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;

  if args.chunks {
    for raw in PngRawChunkIter::new(&bytes)? {
      let raw = raw?;
      let crc_ok = raw.check_crc().is_ok();
      match PngChunk::try_from(raw) {
        Ok(chunk) => info!("{}: {chunk:?} (crc ok: {crc_ok})", path.display()),
        Err(e) => info!("{}: {:?} unparsed: {e} (crc ok: {crc_ok})", path.display(), raw.chunk_type()),
      }
    }
  }

  let mut image = config.decode(&bytes)?;
  if args.flip {
    image.vertical_flip();
  }
  let opaque = image.pixels.iter().all(|p| p.a == u8::MAX);
  info!("{}: {}x{} (opaque: {opaque})", path.display(), image.width, image.height);
  Ok(())
}

#[test]
fn test_level_filter() {
  assert_eq!(level_filter(0, false), LevelFilter::Warn);
  assert_eq!(level_filter(0, true), LevelFilter::Info);
  assert_eq!(level_filter(2, true), LevelFilter::Debug);
  assert_eq!(level_filter(9, false), LevelFilter::Trace);
}
