//! Batch thumbnail converter: cap each input image to a maximum size
//! on its longer side and re-encode as JPEG, mirroring the web app's
//! quick mode.

use std::path::PathBuf;

use clap::Parser;
use kogata_pipeline::{ConvertConfig, JpegQuality};

/// Cap images to a maximum pixel size and re-encode them as JPEGs.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input image paths (PNG, JPEG, BMP, WebP).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Longer-side cap in pixels. Images already within the cap are
    /// re-encoded at their original size.
    #[arg(long, value_name = "PIXELS", default_value_t = 1024)]
    max_size: u32,

    /// JPEG quality: one of 50, 85, 92, 100.
    #[arg(long, value_name = "QUALITY", default_value = "50", value_parser = parse_quality)]
    quality: JpegQuality,

    /// Output directory. Defaults to writing next to each input.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

/// Parse `--quality` into one of the supported encoder levels.
fn parse_quality(s: &str) -> Result<JpegQuality, String> {
    let value: u8 = s
        .parse()
        .map_err(|e| format!("invalid quality '{s}': {e}"))?;
    JpegQuality::from_value(value)
        .ok_or_else(|| format!("quality must be one of 50, 85, 92, 100, got {value}"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)?;
    }

    for input in &args.inputs {
        eprintln!("Reading image from {}", input.display());
        let bytes = std::fs::read(input)?;

        let dimensions = kogata_pipeline::probe_dimensions(&bytes)?;
        let mut config = ConvertConfig::thumbnail(dimensions, args.max_size);
        config.quality = args.quality;

        eprintln!(
            "{}x{} -> {}x{} at quality {}",
            dimensions.width, dimensions.height, config.width, config.height, args.quality,
        );

        let converted = kogata_pipeline::convert(&bytes, &config)?;

        let stem = input.file_stem().map_or_else(
            || "output".to_owned(),
            |s| s.to_string_lossy().into_owned(),
        );
        let output_name = format!("{stem}.jpg");
        let output_path = match &args.output_dir {
            Some(dir) => dir.join(&output_name),
            None => input.with_file_name(&output_name),
        };

        std::fs::write(&output_path, &converted.bytes)?;
        eprintln!(
            "Saved {} ({} bytes)",
            output_path.display(),
            converted.bytes.len(),
        );
    }

    eprintln!("Done.");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn quality_parser_accepts_supported_levels() {
        assert_eq!(parse_quality("50").unwrap(), JpegQuality::Low);
        assert_eq!(parse_quality("85").unwrap(), JpegQuality::Medium);
        assert_eq!(parse_quality("92").unwrap(), JpegQuality::High);
        assert_eq!(parse_quality("100").unwrap(), JpegQuality::Maximum);
    }

    #[test]
    fn quality_parser_rejects_other_values() {
        assert!(parse_quality("75").is_err());
        assert!(parse_quality("0").is_err());
        assert!(parse_quality("best").is_err());
    }
}
