//! Argument parsing and the compress-one-file command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use jpegfit_core::config::{
    DEFAULT_INITIAL_QUALITY, DEFAULT_MAX_INPUT_BYTES, DEFAULT_MIN_QUALITY, DEFAULT_MIN_WIDTH,
    DEFAULT_QUALITY_STEP, DEFAULT_SHRINK_FACTOR,
};
use jpegfit_core::decode::FilterType;
use jpegfit_core::report::bytes_to_rounded_kb;
use jpegfit_core::{
    compress_image, parse_target_size, CompressError, CompressionResult, SearchConfig,
};

/// Re-encode an image as a JPEG no larger than a target size.
///
/// Quality is lowered first; if that is not enough, the image is shrunk.
/// The result is written even when the target cannot be reached.
#[derive(Parser, Debug)]
#[command(name = "jpegfit", version)]
pub struct Args {
    /// Image to compress (JPEG, PNG, GIF, WebP, BMP or TIFF)
    pub input: PathBuf,

    /// Target size in kilobytes, e.g. 100 or "150kb"
    #[arg(short, long, allow_hyphen_values = true)]
    pub target_kb: String,

    /// Where to write the JPEG (default: <input stem>.compressed.jpg next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the JSON report (with the embedded data URI) instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Quality of the first attempt
    #[arg(long, default_value_t = DEFAULT_INITIAL_QUALITY)]
    pub initial_quality: u8,

    /// Quality decrement per step
    #[arg(long, default_value_t = DEFAULT_QUALITY_STEP)]
    pub quality_step: u8,

    /// Lowest quality before switching to resizing
    #[arg(long, default_value_t = DEFAULT_MIN_QUALITY)]
    pub min_quality: u8,

    /// Scale applied to both dimensions per resize step
    #[arg(long, default_value_t = DEFAULT_SHRINK_FACTOR)]
    pub shrink_factor: f64,

    /// Stop resizing once the width is at or below this
    #[arg(long, default_value_t = DEFAULT_MIN_WIDTH)]
    pub min_width: u32,

    /// Interpolation used when resizing
    #[arg(long, value_enum, default_value_t = Filter::Bilinear)]
    pub filter: Filter,

    /// Refuse inputs larger than this many bytes
    #[arg(long, default_value_t = DEFAULT_MAX_INPUT_BYTES)]
    pub max_input_bytes: usize,

    /// Log every encoding attempt
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Filter {
    Nearest,
    Bilinear,
    Lanczos3,
}

impl From<Filter> for FilterType {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => FilterType::Nearest,
            Filter::Bilinear => FilterType::Bilinear,
            Filter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Args {
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            initial_quality: self.initial_quality,
            quality_step: self.quality_step,
            min_quality: self.min_quality,
            shrink_factor: self.shrink_factor,
            min_width: self.min_width,
            resize_filter: self.filter.into(),
            max_input_bytes: self.max_input_bytes,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(path) => path.clone(),
            None => default_output_path(&self.input),
        }
    }
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{}.compressed.jpg", stem))
}

/// Compress `args.input`, write the JPEG, and return what was written.
pub fn run(args: &Args) -> Result<CompressionResult> {
    let budget = parse_target_size(Some(&args.target_kb), None)
        .with_context(|| format!("invalid --target-kb {:?}", args.target_kb))?;

    let size = fs::metadata(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?
        .len();
    if size > args.max_input_bytes as u64 {
        return Err(CompressError::InputTooLarge {
            size: usize::try_from(size).unwrap_or(usize::MAX),
            limit: args.max_input_bytes,
        })
        .with_context(|| format!("refusing {}", args.input.display()));
    }

    let input = fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let result = compress_image(&input, budget, &args.search_config()).map_err(|err| {
        if !err.is_client_error() {
            log::error!("Compression error for {}: {}", args.input.display(), err);
        }
        err
    })?;

    let output = args.output_path();
    fs::write(&output, &result.jpeg)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.to_report())?);
    } else {
        println!("{}", summary(&result, &output));
    }

    if !result.within_budget {
        log::warn!(
            "target of {} KB not reached; wrote {} bytes",
            budget.kilobytes(),
            result.compressed_len()
        );
    }

    Ok(result)
}

fn summary(result: &CompressionResult, output: &Path) -> String {
    format!(
        "{} KB -> {} KB ({}%), {}x{} -> {}x{} at quality {}, written to {}",
        bytes_to_rounded_kb(result.original_len),
        bytes_to_rounded_kb(result.compressed_len()),
        result.compression_ratio(),
        result.original_width,
        result.original_height,
        result.width,
        result.height,
        result.quality,
        output.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpegfit_core::decode::DecodedImage;
    use jpegfit_core::encode::encode_jpeg;

    fn write_sample(dir: &Path) -> PathBuf {
        let pixels = (0..120 * 90 * 3).map(|i| (i % 251) as u8).collect();
        let jpeg = encode_jpeg(&DecodedImage::new(120, 90, pixels), 95).unwrap();
        let path = dir.join("photo.jpg");
        fs::write(&path, jpeg).unwrap();
        path
    }

    #[test]
    fn test_defaults_match_core_config() {
        let args = Args::try_parse_from(["jpegfit", "in.png", "-t", "100"]).unwrap();
        assert_eq!(args.search_config(), SearchConfig::default());
        assert!(!args.json);
    }

    #[test]
    fn test_overrides_reach_config() {
        let args = Args::try_parse_from([
            "jpegfit",
            "in.png",
            "--target-kb",
            "50",
            "--min-quality",
            "30",
            "--shrink-factor",
            "0.75",
            "--filter",
            "lanczos3",
        ])
        .unwrap();

        let config = args.search_config();
        assert_eq!(config.min_quality, 30);
        assert_eq!(config.shrink_factor, 0.75);
        assert_eq!(config.resize_filter, FilterType::Lanczos3);
    }

    #[test]
    fn test_target_is_required() {
        assert!(Args::try_parse_from(["jpegfit", "in.png"]).is_err());
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/shots/cat.png")),
            PathBuf::from("/tmp/shots/cat.compressed.jpg")
        );
    }

    #[test]
    fn test_run_writes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let output = dir.path().join("out.jpg");

        let args = Args::try_parse_from([
            "jpegfit",
            input.to_str().unwrap(),
            "-t",
            "200kb",
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap();

        let result = run(&args).unwrap();
        let written = fs::read(&output).unwrap();
        assert_eq!(written, result.jpeg);
        assert_eq!(&written[0..2], &[0xFF, 0xD8]);
        assert!(result.within_budget);
    }

    #[test]
    fn test_run_rejects_bad_target_before_reading() {
        let args =
            Args::try_parse_from(["jpegfit", "/nonexistent/file.png", "-t", "-5"]).unwrap();
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("invalid --target-kb"));
    }

    #[test]
    fn test_run_refuses_oversized_file_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_sample(dir.path());
        let output = dir.path().join("out.jpg");

        let args = Args::try_parse_from([
            "jpegfit",
            input.to_str().unwrap(),
            "-t",
            "100",
            "-o",
            output.to_str().unwrap(),
            "--max-input-bytes",
            "64",
        ])
        .unwrap();

        let err = run(&args).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CompressError>(),
            Some(CompressError::InputTooLarge { limit: 64, .. })
        ));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_reports_missing_file() {
        let args = Args::try_parse_from(["jpegfit", "/nonexistent/file.png", "-t", "10"]).unwrap();
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
