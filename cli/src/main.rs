mod config;

use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use jigsaw_cutter_core::{CutSettings, EdgeSide, GridSpec};
use jigsaw_cutter_pipeline::sink::JPEG_QUALITY_DEFAULT;
use jigsaw_cutter_pipeline::{
    load_image, resize_to_max_dim, CutMode, ExportFormat, FileSink, PieceCutter,
    OUTLINE_WITH_IMAGE_NAME,
};

use crate::config::CutConfig;

#[derive(Parser)]
#[command(name = "jigsaw-cutter", version, about = "Cut an image into jigsaw puzzle pieces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cut an image into piece files plus two seam overviews.
    Cut(CutArgs),
    /// Print edge types and crop boxes of every cell without touching pixels.
    Slots(SlotsArgs),
}

#[derive(Args)]
struct CutArgs {
    image: PathBuf,
    #[arg(long)]
    rows: u32,
    #[arg(long)]
    cols: u32,
    #[arg(long, value_enum, default_value_t = ModeArg::Classic)]
    mode: ModeArg,
    #[arg(long, env = "JIGSAW_OUTPUT_DIR", default_value = "puzzle_pieces")]
    output_dir: PathBuf,
    #[arg(long, default_value = "piece_")]
    prefix: String,
    #[arg(long, value_enum, default_value_t = FormatArg::Png)]
    format: FormatArg,
    /// JPEG quality, 1-100.
    #[arg(long)]
    quality: Option<u8>,
    #[arg(long)]
    arc_ratio: Option<f64>,
    #[arg(long)]
    connect_ratio: Option<f64>,
    /// Downscale so the longer side is at most this many pixels.
    #[arg(long)]
    max_dim: Option<u32>,
    #[arg(long, env = "JIGSAW_CUT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct SlotsArgs {
    #[arg(long)]
    rows: u32,
    #[arg(long)]
    cols: u32,
    #[arg(long)]
    width: u32,
    #[arg(long)]
    height: u32,
    #[arg(long, env = "JIGSAW_CUT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Classic,
    Rectangular,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Cut(args) => run_cut(args),
        Commands::Slots(args) => run_slots(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<CutConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            log::info!("loading settings from {}", path.display());
            Ok(CutConfig::load(path)?)
        }
        None => Ok(CutConfig::default()),
    }
}

fn run_cut(args: CutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_ref())?;
    let mut settings: CutSettings = config.settings;
    if let Some(arc_ratio) = args.arc_ratio {
        settings.arc_ratio = arc_ratio;
    }
    if let Some(connect_ratio) = args.connect_ratio {
        settings.connect_ratio = connect_ratio;
    }
    let format = match args.format {
        FormatArg::Png => ExportFormat::Png,
        FormatArg::Jpeg => ExportFormat::Jpeg {
            quality: args
                .quality
                .or(config.jpeg_quality)
                .unwrap_or(JPEG_QUALITY_DEFAULT),
        },
    };
    let mode = match args.mode {
        ModeArg::Classic => CutMode::Classic,
        ModeArg::Rectangular => CutMode::Rectangular,
    };

    let image = load_image(&args.image)?;
    let image = resize_to_max_dim(image, args.max_dim.or(config.max_dim));

    GridSpec::new(args.rows, args.cols, image.width(), image.height(), &settings)?;
    std::fs::create_dir_all(&args.output_dir)?;
    let prefix = args.output_dir.join(&args.prefix);
    let mut sink = FileSink::new(prefix.to_string_lossy().into_owned()).with_format(format);
    let total = args.rows as usize * args.cols as usize;
    let step = (total / 10).max(1);

    PieceCutter::new(settings)
        .with_progress(|progress| {
            if progress.done % step == 0 || progress.done == progress.total {
                log::info!("{}/{} pieces", progress.done, progress.total);
            }
        })
        .cut(mode, &image, args.rows, args.cols, &mut sink)?;

    println!("{}", sink.path_for(OUTLINE_WITH_IMAGE_NAME).display());
    Ok(())
}

fn run_slots(args: SlotsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_ref())?;
    let grid = GridSpec::new(args.rows, args.cols, args.width, args.height, &config.settings)?;
    for slot in grid.slots() {
        let labels: Vec<String> = EdgeSide::ORDER
            .iter()
            .map(|side| format!("{:?}={}", side, slot.edge(*side).label()).to_lowercase())
            .collect();
        let (left, top, right, bottom) = slot.crop.as_tuple();
        println!(
            "{}_{}\t{}\tcrop=({left}, {top}, {right}, {bottom})\tcenter=({:.1}, {:.1})",
            slot.row,
            slot.col,
            labels.join(" "),
            slot.center_offset.0,
            slot.center_offset.1
        );
    }
    Ok(())
}
