use clap::{Args, Parser, Subcommand};
use image::GrayImage;
use rust_ean::synthetic::{SYMBOL_MODULES, render_gray_image};
use rust_ean::tools::{
    bench_limit_from_env, dataset_iter, dataset_root_from_env, highlight, load_gray, ratio_strip,
};
use rust_ean::utils::binarization::Cutoff;
use rust_ean::utils::profile::ProfileBuilder;
use rust_ean::{DecoderConfig, Detector, Ean13, ThresholdMode};
use std::path::{Path, PathBuf};
use std::time::Instant;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "eantool", version, about = "EAN-13 scanline decoding tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode the code along the middle row of an image
    Decode {
        #[arg(long)]
        image: PathBuf,
        #[command(flatten)]
        decoder: DecoderArgs,
    },
    /// Print the scanline profile and how far each decode stage got
    Inspect {
        #[arg(long)]
        image: PathBuf,
        #[command(flatten)]
        decoder: DecoderArgs,
    },
    /// Decode every image in a dataset and report the reading rate
    Batch {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        decoder: DecoderArgs,
    },
    /// Render a synthetic symbol to an image file
    Render {
        /// 13 digits, optionally grouped as 4-006381-333931
        #[arg(long)]
        code: String,
        #[arg(long)]
        out: PathBuf,
        /// Module width in pixels
        #[arg(long, default_value_t = 4)]
        module: usize,
        #[arg(long, default_value_t = 60)]
        height: usize,
        /// Quiet zone on each side, in modules
        #[arg(long, default_value_t = 48)]
        margin: usize,
    },
    /// Write the thresholded image cropped to the decoded span
    Highlight {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        decoder: DecoderArgs,
    },
}

#[derive(Args, Clone, Copy)]
struct DecoderArgs {
    /// Ratio blocks per scanline (defaults to EAN_BLOCKS or 40)
    #[arg(long)]
    blocks: Option<usize>,
    /// Reject codes with a wrong check digit
    #[arg(long)]
    verify_check_digit: bool,
    /// Binarization: otsu or moving-average (defaults to EAN_THRESHOLD or otsu)
    #[arg(long)]
    threshold: Option<ThresholdMode>,
    /// Search pixels for the start guard when no guard run is found
    #[arg(long)]
    preamble_fallback: bool,
}

impl DecoderArgs {
    fn to_config(self) -> DecoderConfig {
        let mut config = DecoderConfig::from_env();
        if let Some(blocks) = self.blocks {
            config = config.with_blocks(blocks);
        }
        if self.verify_check_digit {
            config = config.with_check_digit(true);
        }
        if let Some(threshold) = self.threshold {
            config = config.with_threshold(threshold);
        }
        if self.preamble_fallback {
            config = config.with_preamble_fallback(true);
        }
        config
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Decode { image, decoder } => decode_cmd(&image, decoder.to_config()),
        Command::Inspect { image, decoder } => inspect_cmd(&image, decoder.to_config()),
        Command::Batch {
            root,
            limit,
            decoder,
        } => batch_cmd(root, limit, decoder.to_config()),
        Command::Render {
            code,
            out,
            module,
            height,
            margin,
        } => render_cmd(&code, &out, module, height, margin),
        Command::Highlight {
            image,
            out,
            decoder,
        } => highlight_cmd(&image, &out, decoder.to_config()),
    }
}

fn load(image: &Path) -> CliResult<(Vec<u8>, usize, usize)> {
    tracing::info!("Loading image: {}", image.display());
    load_gray(image).map_err(|e| -> CliError {
        format!("Failed to open image {}: {}", image.display(), e).into()
    })
}

fn decode_cmd(image: &Path, config: DecoderConfig) -> CliResult<()> {
    let (gray, width, height) = load(image)?;
    let detector = Detector::new(config);
    match detector.detect_gray(&gray, width, height) {
        Ok(result) => {
            println!("{}", result.code.grouped());
            tracing::info!(
                "span {}..{}, module width {:.2}px, check digit {}",
                result.span.start,
                result.span.end,
                result.module_width,
                if result.code.has_valid_check_digit() {
                    "ok"
                } else {
                    "mismatch"
                }
            );
            Ok(())
        }
        Err(err) => Err(format!("{}: {}", image.display(), err).into()),
    }
}

fn inspect_cmd(image: &Path, config: DecoderConfig) -> CliResult<()> {
    let (gray, width, height) = load(image)?;
    let profile = ProfileBuilder::new(&config);
    let line = profile.intensity_line(&gray, width, height)?;
    let detector = Detector::new(config.clone());
    let scanline = detector.scanline(&gray, width, height)?;

    println!("Image: {} ({}x{})", image.display(), width, height);
    let band = profile.band(height);
    println!("Band rows: {}..{}", band.start, band.end);
    match profile.cutoff(&line) {
        Cutoff::Global(threshold) => println!("Threshold: {} {}", profile.threshold(), threshold),
        Cutoff::Local(bounds) => {
            let (lo, hi) = bounds
                .iter()
                .fold((f64::MAX, f64::MIN), |(lo, hi), &b| (lo.min(b), hi.max(b)));
            println!("Threshold: {} {:.0}..{:.0}", profile.threshold(), lo, hi);
        }
    }
    println!(
        "Blocks: {} x {}px",
        scanline.blocks(),
        scanline.block_size()
    );
    println!("Ratios: {}", ratio_strip(scanline.ratios(), &config));

    let (result, tel) = detector.detect_gray_with_telemetry(&gray, width, height);
    match &tel.run {
        Some(run) => println!("Guard run: block {} + {} bars", run.start, run.len()),
        None => println!("Guard run: none"),
    }
    if let Some(start) = tel.preamble {
        println!("Preamble: pixel {start}");
    }
    if let Some(window) = &tel.window {
        println!("Window: {}..{}", window.start, window.end);
    }
    if let Some(module_width) = tel.module_width {
        println!("Module width: {module_width:.2}px");
    }
    println!("Digits decoded: {}/12", tel.digits_decoded);
    if let Some(parity) = tel.parity {
        println!("Parity: {}", parity.to_oe_string());
    }
    match result {
        Ok(result) => println!("Result: {}", result.code.grouped()),
        Err(err) => println!("Result: {} ({})", err, err.kind()),
    }
    Ok(())
}

fn batch_cmd(root: Option<PathBuf>, limit: Option<usize>, config: DecoderConfig) -> CliResult<()> {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let limit = limit.or_else(bench_limit_from_env);
    let detector = Detector::new(config);

    let mut total = 0usize;
    let mut decoded = 0usize;
    let start = Instant::now();

    for path in dataset_iter(&root, limit) {
        total += 1;
        let (gray, width, height) = match load_gray(&path) {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::warn!("{}: failed to load: {}", path.display(), err);
                continue;
            }
        };
        match detector.detect_gray(&gray, width, height) {
            Ok(result) => {
                decoded += 1;
                println!("{}\t{}", path.display(), result.code.grouped());
            }
            Err(err) => println!("{}\terr {}", path.display(), err),
        }
    }

    if total == 0 {
        return Err(format!("no images found under {}", root.display()).into());
    }
    let elapsed = start.elapsed();
    println!(
        "Decoded {}/{} ({:.1}%) in {:.2?}",
        decoded,
        total,
        decoded as f64 * 100.0 / total as f64,
        elapsed
    );
    Ok(())
}

fn render_cmd(code: &str, out: &Path, module: usize, height: usize, margin: usize) -> CliResult<()> {
    let code: Ean13 = code.parse()?;
    if !code.has_valid_check_digit() {
        tracing::warn!("{} has an invalid check digit", code);
    }
    let module = module.max(1);
    let offset = margin * module;
    let width = offset * 2 + SYMBOL_MODULES * module;
    let gray = render_gray_image(&code, module, offset, width, height);
    let img = GrayImage::from_raw(width as u32, height as u32, gray)
        .ok_or("rendered buffer does not match image size")?;
    img.save(out)?;
    tracing::info!("Wrote {} ({}x{}) to {}", code.grouped(), width, height, out.display());
    Ok(())
}

fn highlight_cmd(image: &Path, out: &Path, config: DecoderConfig) -> CliResult<()> {
    let (gray, width, height) = load(image)?;
    let detector = Detector::new(config.clone());
    let span = match detector.detect_gray(&gray, width, height) {
        Ok(result) => {
            println!("{}", result.code.grouped());
            Some(result.span)
        }
        Err(err) => {
            println!("err {err}");
            None
        }
    };
    let img = highlight(&gray, width, height, span, &config).ok_or("image has no pixels")?;
    img.save(out)?;
    tracing::info!("Highlight written to {}", out.display());
    Ok(())
}
