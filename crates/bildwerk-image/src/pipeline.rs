// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end normalization: open → normalize color → thumbnail → encode.
//
// `try_process` returns the first failing step as a `BildwerkError`;
// `process` logs that error and collapses it to `false`.

use std::path::Path;

use bildwerk_core::{
    BoundingBox, DEFAULT_MAX_SIZE, Dimensions, NormalizeConfig, PixelFormat, Result,
};
use tracing::{error, info, instrument};

use crate::normalize::processor::ImageNormalizer;

/// What a successful run did to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeReport {
    pub source_size: Dimensions,
    pub source_format: PixelFormat,
    pub output_size: Dimensions,
    pub output_format: PixelFormat,
    /// Size of the encoded JPEG.
    pub encoded_bytes: usize,
}

/// Normalize `input` into a JPEG at `output`, fitting inside `max_size`.
///
/// Returns `true` only if every step succeeded. Failures are reported as
/// `false` and emitted as a `tracing` error event carrying the underlying
/// error text; the message only reaches a terminal or log if the caller has
/// installed a subscriber (the `bildwerk` binary installs one on stderr).
/// Use [`try_process`] to get the error itself.
pub fn process(input: impl AsRef<Path>, output: impl AsRef<Path>, max_size: (u32, u32)) -> bool {
    let (input, output) = (input.as_ref(), output.as_ref());

    let result = BoundingBox::try_from(max_size).and_then(|bounds| {
        try_process(input, output, &NormalizeConfig::default().with_max_size(bounds))
    });

    match result {
        Ok(report) => {
            info!(
                input = %input.display(),
                output = %output.display(),
                size = %report.output_size,
                bytes = report.encoded_bytes,
                "Image processed"
            );
            true
        }
        Err(err) => {
            error!(
                input = %input.display(),
                output = %output.display(),
                kind = ?err.kind(),
                "Error processing image: {err}"
            );
            false
        }
    }
}

/// [`process`] with the default 800x800 bounding box.
pub fn process_default(input: impl AsRef<Path>, output: impl AsRef<Path>) -> bool {
    process(input, output, DEFAULT_MAX_SIZE)
}

/// Run the full pipeline from file to file, returning the first failure.
///
/// The output file is not touched unless decoding, normalization and
/// encoding all succeed.
#[instrument(skip_all, fields(input = %input.as_ref().display(), output = %output.as_ref().display()))]
pub fn try_process(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &NormalizeConfig,
) -> Result<NormalizeReport> {
    let source = ImageNormalizer::open(input)?;
    let (normalized, mut report) = normalize(source, config)?;
    report.encoded_bytes = normalized.save_jpeg(output, config.quality, config.optimize)?;
    Ok(report)
}

/// Run the full pipeline on encoded bytes held in memory, returning the JPEG
/// bytes alongside the report.
#[instrument(skip_all, fields(data_len = data.len()))]
pub fn process_bytes(data: &[u8], config: &NormalizeConfig) -> Result<(Vec<u8>, NormalizeReport)> {
    let source = ImageNormalizer::from_bytes(data)?;
    let (normalized, mut report) = normalize(source, config)?;
    let jpeg = normalized.to_jpeg_bytes(config.quality, config.optimize)?;
    report.encoded_bytes = jpeg.len();
    Ok((jpeg, report))
}

/// Color normalization and resize, shared by the file and in-memory paths.
fn normalize(
    source: ImageNormalizer,
    config: &NormalizeConfig,
) -> Result<(ImageNormalizer, NormalizeReport)> {
    let source_size = source.dimensions();
    let source_format = source.pixel_format();

    let normalized = source.normalize_color()?.thumbnail(config.max_size);

    let report = NormalizeReport {
        source_size,
        source_format,
        output_size: normalized.dimensions(),
        output_format: normalized.pixel_format(),
        encoded_bytes: 0,
    };
    Ok((normalized, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildwerk_core::{ColorMode, ErrorKind};
    use image::{ColorType, DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn scratch() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    /// Save `img` under `dir` with a name whose extension picks the format.
    fn write_fixture(dir: &TempDir, name: &str, img: &DynamicImage) -> PathBuf {
        let path = dir.path().join(name);
        img.save(&path).expect("write fixture");
        path
    }

    fn gradient_rgba(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn large_rgba_png_is_bounded_and_flattened() {
        let dir = scratch();
        let input = write_fixture(&dir, "wide.png", &gradient_rgba(4000, 2000));
        let output = dir.path().join("wide.jpg");

        assert!(process_default(&input, &output));

        let decoded = image::open(&output).expect("decode output");
        assert_eq!((decoded.width(), decoded.height()), (800, 400));
        assert_eq!(decoded.color(), ColorType::Rgb8);
    }

    #[test]
    fn small_palette_gif_keeps_its_size() {
        let dir = scratch();
        let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(200, 150, |x, y| {
            if (x / 10 + y / 10) % 2 == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        }));
        let input = write_fixture(&dir, "small.gif", &img);
        let output = dir.path().join("small.jpg");

        let report = try_process(&input, &output, &NormalizeConfig::default()).expect("process");
        assert_eq!(report.source_size, Dimensions::new(200, 150));
        assert_eq!(report.output_size, Dimensions::new(200, 150));
        assert_eq!(report.output_format, PixelFormat::RGB8);

        let decoded = image::open(&output).expect("decode output");
        assert_eq!((decoded.width(), decoded.height()), (200, 150));
        assert_eq!(decoded.color(), ColorType::Rgb8);
    }

    #[test]
    fn grayscale_input_stays_grayscale() {
        let dir = scratch();
        let img = DynamicImage::ImageLuma8(GrayImage::from_fn(120, 90, |x, _| Luma([(x * 2) as u8])));
        let input = write_fixture(&dir, "gray.png", &img);
        let output = dir.path().join("gray.jpg");

        assert!(process_default(&input, &output));
        let decoded = image::open(&output).expect("decode output");
        assert_eq!(decoded.color(), ColorType::L8);
    }

    #[test]
    fn rerun_produces_identical_output() {
        let dir = scratch();
        let input = write_fixture(&dir, "photo.png", &gradient_rgba(900, 600));
        let output = dir.path().join("photo.jpg");

        assert!(process_default(&input, &output));
        let first = std::fs::read(&output).expect("read first");
        assert!(process_default(&input, &output));
        let second = std::fs::read(&output).expect("read second");
        assert_eq!(first, second);
    }

    #[test]
    fn output_is_jpeg_whatever_the_extension() {
        let dir = scratch();
        let input = write_fixture(&dir, "in.png", &gradient_rgba(50, 50));
        let output = dir.path().join("out.png");

        assert!(process_default(&input, &output));
        let bytes = std::fs::read(&output).expect("read output");
        assert_eq!(&bytes[..3], &[0xFF, 0xD8, 0xFF]);
        assert_eq!(
            image::guess_format(&bytes).expect("guess"),
            image::ImageFormat::Jpeg
        );
    }

    #[test]
    fn custom_bounding_box_is_enforced() {
        let dir = scratch();
        let input = write_fixture(&dir, "tall.png", &gradient_rgba(300, 900));
        let output = dir.path().join("tall.jpg");

        assert!(process(&input, &output, (200, 300)));
        let decoded = image::open(&output).expect("decode output");
        assert_eq!((decoded.width(), decoded.height()), (100, 300));
    }

    #[test]
    fn missing_input_fails_without_output() {
        let dir = scratch();
        let input = dir.path().join("does-not-exist.png");
        let output = dir.path().join("never.jpg");

        assert!(!process_default(&input, &output));
        assert!(!output.exists());

        let err = try_process(&input, &output, &NormalizeConfig::default())
            .err()
            .expect("missing input");
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn corrupt_input_is_a_decode_error() {
        let dir = scratch();
        let input = dir.path().join("broken.png");
        std::fs::write(&input, b"\x89PNG\r\n\x1a\nthis is not really a png").expect("write");
        let output = dir.path().join("broken.jpg");

        let err = try_process(&input, &output, &NormalizeConfig::default())
            .err()
            .expect("corrupt input");
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(!output.exists());
    }

    #[test]
    fn unwritable_output_is_a_write_error() {
        let dir = scratch();
        let input = write_fixture(&dir, "ok.png", &gradient_rgba(20, 20));
        let output = dir.path().join("missing-dir").join("out.jpg");

        let err = try_process(&input, &output, &NormalizeConfig::default())
            .err()
            .expect("unwritable output");
        assert_eq!(err.kind(), ErrorKind::Write);
        assert!(!process_default(&input, &output));
    }

    #[test]
    fn zero_bounding_box_fails() {
        let dir = scratch();
        let input = write_fixture(&dir, "ok.png", &gradient_rgba(20, 20));
        let output = dir.path().join("out.jpg");

        assert!(!process(&input, &output, (0, 800)));
        assert!(!output.exists());
    }

    #[test]
    fn in_memory_pipeline_matches_file_pipeline() {
        let dir = scratch();
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(1000, 500, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 64])
        }));
        let input = write_fixture(&dir, "mem.png", &img);
        let output = dir.path().join("mem.jpg");
        let config = NormalizeConfig::default();

        let data = std::fs::read(&input).expect("read input");
        let (jpeg, report) = process_bytes(&data, &config).expect("process bytes");
        assert_eq!(report.output_size, Dimensions::new(800, 400));
        assert_eq!(report.source_format.mode, ColorMode::Rgb);
        assert_eq!(report.encoded_bytes, jpeg.len());

        try_process(&input, &output, &config).expect("process file");
        assert_eq!(std::fs::read(&output).expect("read output"), jpeg);
    }
}
