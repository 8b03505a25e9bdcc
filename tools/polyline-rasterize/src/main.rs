// polyline-rasterize: burn encoded polylines into a georeferenced PNG.
//
// Usage:
//   polyline-rasterize <input> <output.png> [--width N] [--height N]
//                      [--precision P] [--strict] [--config raster.json] [-v...]
//
// The input is either a JSON array (bare strings or activity records with a
// `map.summary_polyline` field) or a text file with one polyline per line.
// Next to the PNG, `<stem>.pgw` and `<stem>.prj` are written.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, LevelFilter};
use polyline_raster::input::load_polylines;
use polyline_raster::{run, MalformedPolicy, PngWorldFileSink, RasterConfig};

#[derive(Parser, Debug)]
#[command(
    name = "polyline-rasterize",
    version,
    about = "Burn encoded polylines into a georeferenced grayscale PNG"
)]
struct Cli {
    /// Polyline file: JSON array or one encoded polyline per line
    input: PathBuf,
    /// Output PNG; world file and projection are written next to it
    output: PathBuf,
    /// JSON configuration file; command line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Raster width in pixels
    #[arg(long)]
    width: Option<u32>,
    /// Raster height in pixels
    #[arg(long)]
    height: Option<u32>,
    /// Decimal places of the encoding (5 for Google, 6 for OSRM)
    #[arg(long)]
    precision: Option<u32>,
    /// Fail on the first malformed polyline instead of skipping it
    #[arg(long)]
    strict: bool,
    /// Decode and burn on a single thread
    #[arg(long)]
    serial: bool,
    /// More log output (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn raster_config(&self) -> Result<RasterConfig> {
        let mut config = match &self.config {
            Some(path) => RasterConfig::from_json_file(path)
                .with_context(|| format!("reading config {}", path.display()))?,
            None => RasterConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(precision) = self.precision {
            config.precision = precision;
        }
        if self.strict {
            config.on_malformed = MalformedPolicy::Abort;
        }
        if self.serial {
            config.parallel = false;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.raster_config()?;
    debug!("{:?}", config);

    let polylines = load_polylines(&cli.input)
        .with_context(|| format!("loading polylines from {}", cli.input.display()))?;
    if polylines.is_empty() {
        bail!("no polylines found in {}", cli.input.display());
    }

    let mut sink = PngWorldFileSink::new(&cli.output);
    let summary = run(&polylines, &config, &mut sink)
        .with_context(|| format!("rasterizing {}", cli.input.display()))?;

    println!(
        "{}: {} paths ({} malformed, {} empty), {}x{} raster, {} pixels burned",
        cli.output.display(),
        summary.paths,
        summary.malformed,
        summary.empty,
        config.width,
        config.height,
        summary.burned_pixels
    );
    Ok(())
}
