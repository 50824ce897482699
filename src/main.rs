use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info};

use gcbanner::extract::{ExtractRequest, Extractor};
use gcbanner::writer::{AnimFormat, CodecWriter, ImageWriter, WriterConfig};
use gcbanner::Error;

/// Extract banners and icons from GameCube / Wii banner files.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Input file: opening.bnr, banner.bin, or an SD-exported data.bin.
    #[arg(required_unless_present = "list_formats")]
    input: Option<PathBuf>,

    /// Write the banner to FILE.
    #[arg(short = 'b', value_name = "FILE")]
    banner: Option<PathBuf>,

    /// Write the banner to <input>.banner.png.
    #[arg(short = 'B')]
    banner_default: bool,

    /// Write the icon to FILE.
    #[arg(short = 'i', value_name = "FILE")]
    icon: Option<PathBuf>,

    /// Write the icon to <input>.icon.<ext>.
    #[arg(short = 'I')]
    icon_default: bool,

    /// Animated icon format: apng, gif, fpf, vs, hs.
    #[arg(short = 'f', long = "format", value_parser = parse_format)]
    format: Option<AnimFormat>,

    /// Length of one icon-delay tick in milliseconds.
    #[arg(long = "tick-ms", value_name = "MS")]
    tick_ms: Option<f64>,

    /// List animated formats and exit.
    #[arg(long = "list-formats")]
    list_formats: bool,

    /// Enable debug logging.
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn parse_format(s: &str) -> Result<AnimFormat, String> {
    AnimFormat::from_name(s).ok_or_else(|| format!("unknown animated format '{s}'"))
}

fn exit_code(e: &Error) -> u8 {
    match e {
        Error::Io(_) => 1,
        Error::UnknownFormat => 3,
        Error::InvalidSize { .. } | Error::TruncatedRead | Error::TruncatedPixelData { .. } => 4,
        Error::NoIcon => 5,
        Error::NoAnimFormatAvailable | Error::UnsupportedFormat(_) => 6,
        Error::Encode(_) => 7,
    }
}

/// `dir/game.bin` -> `dir/game.<suffix>`
fn default_output(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{stem}.{suffix}"))
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = WriterConfig::default();
    if let Some(ms) = args.tick_ms {
        if !ms.is_finite() || ms <= 0.0 {
            error!("--tick-ms must be a positive number");
            return ExitCode::from(2);
        }
        config.tick = Duration::from_secs_f64(ms / 1000.0);
    }
    let writer = CodecWriter::new(config);

    if args.list_formats {
        for info in writer.formats() {
            println!(
                "{:<5} .{:<4} {:<24} {}",
                info.name,
                info.extension,
                info.description,
                if info.available { "available" } else { "not available" }
            );
        }
        return ExitCode::SUCCESS;
    }
    let Some(input) = args.input.as_deref() else {
        return ExitCode::from(2);
    };

    let mut extractor = Extractor::new(writer);
    if let Some(format) = args.format {
        extractor = match extractor.with_anim_format(format) {
            Ok(ex) => ex,
            Err(e) => {
                error!("{e}");
                return ExitCode::from(exit_code(&e));
            }
        };
    }

    let mut request = ExtractRequest {
        banner: args.banner.clone(),
        icon: args.icon.clone(),
        icon_auto_ext: false,
    };
    if args.banner_default {
        request.banner = Some(default_output(input, "banner.png"));
    }
    if args.icon_default {
        request.icon = Some(default_output(input, "icon.png"));
        request.icon_auto_ext = true;
    }
    if request.banner.is_none() && request.icon.is_none() {
        request.banner = Some(default_output(input, "banner.png"));
    }

    match extractor.extract(input, &request) {
        Ok(report) => {
            info!("{}: {}", input.display(), report.kind.name());
            if let Some(path) = &report.banner {
                info!("banner: {}", path.display());
            }
            for path in &report.icon {
                info!("icon: {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}: {e}", input.display());
            ExitCode::from(exit_code(&e))
        }
    }
}
