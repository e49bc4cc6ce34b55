// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image normalizer — color-mode conversion, bounded thumbnail resize, and
// JPEG encoding. Decoding and resampling use the `image` crate; encoding uses
// `jpeg-encoder` for its optimized Huffman tables.

use std::io::Write;
use std::path::Path;

use bildwerk_core::{
    BildwerkError, BoundingBox, ColorMode, Dimensions, PixelFormat, Result, SampleDepth,
};
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageReader};
use tracing::{debug, info, instrument};

/// Normalization pipeline over a single decoded image.
///
/// The normalizer owns the decoded pixels exclusively; they are released
/// when it is dropped, on every exit path. Transformations consume `self`
/// and return a new `ImageNormalizer`, enabling method chaining.
///
/// ```ignore
/// let bytes = ImageNormalizer::open("upload.png")?
///     .normalize_color()?
///     .thumbnail(BoundingBox::default())
///     .to_jpeg_bytes(85, true)?;
/// ```
pub struct ImageNormalizer {
    /// The current working image.
    image: DynamicImage,
}

impl ImageNormalizer {
    // -- Construction ---------------------------------------------------------

    /// Decode an image file. The format is guessed from the file contents, not
    /// from the extension.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| {
                BildwerkError::Decode(format!("failed to open {}: {}", path.display(), err))
            })?;
        let image = reader.decode().map_err(|err| {
            BildwerkError::Decode(format!("failed to decode {}: {}", path.display(), err))
        })?;
        info!(
            width = image.width(),
            height = image.height(),
            format = %pixel_format(image.color()),
            "Image loaded"
        );
        Ok(Self { image })
    }

    /// Create a normalizer from raw encoded bytes (JPEG, PNG, GIF, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(data)
            .map_err(|err| BildwerkError::Decode(err.to_string()))?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }

    /// Channel layout and sample depth of the current image.
    pub fn pixel_format(&self) -> PixelFormat {
        pixel_format(self.image.color())
    }

    pub fn color_mode(&self) -> ColorMode {
        self.pixel_format().mode
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the normalizer and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Restrict the image to a layout baseline JPEG can store.
    ///
    /// 8-bit RGB and 8-bit gray pass through untouched. Anything carrying an
    /// alpha channel (including palette images, which decoders expand to RGB
    /// or RGBA) becomes 8-bit RGB; alpha is dropped and the color channels are
    /// kept as stored. High-depth gray becomes 8-bit gray, high-depth color
    /// becomes 8-bit RGB.
    #[instrument(skip(self))]
    pub fn normalize_color(self) -> Result<Self> {
        let dims = self.dimensions();
        if dims.width == 0 || dims.height == 0 {
            return Err(BildwerkError::Conversion(format!(
                "image {dims} has no pixels"
            )));
        }

        let before = self.pixel_format();
        if before.is_jpeg_compatible() {
            debug!(format = %before, "Color mode already compatible");
            return Ok(self);
        }

        let converted = match before.mode {
            ColorMode::Gray => DynamicImage::ImageLuma8(self.image.to_luma8()),
            ColorMode::GrayAlpha | ColorMode::Rgb | ColorMode::Rgba => {
                DynamicImage::ImageRgb8(self.image.to_rgb8())
            }
        };

        let after = pixel_format(converted.color());
        if !after.is_jpeg_compatible() {
            return Err(BildwerkError::Conversion(format!(
                "converting {before} produced {after}"
            )));
        }
        info!(
            from = %before,
            to = %after,
            dropped_alpha = before.mode.has_alpha(),
            "Converted color mode"
        );
        Ok(Self { image: converted })
    }

    /// Shrink the image to fit inside `bounds`, preserving aspect ratio.
    /// Uses Lanczos3 filtering. Images already inside the box are left alone.
    #[instrument(skip_all, fields(bounds = %bounds))]
    pub fn thumbnail(self, bounds: BoundingBox) -> Self {
        let current = self.dimensions();
        let target = current.fit_within(bounds);
        if target == current {
            debug!(size = %current, "Within bounds, keeping original size");
            return self;
        }

        info!(from = %current, to = %target, "Resizing image");
        let resized = self
            .image
            .resize_exact(target.width, target.height, FilterType::Lanczos3);
        Self { image: resized }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as baseline JPEG into `writer`.
    ///
    /// The image must already be normalized. `quality` is clamped to 1-100.
    /// With `optimize` set, Huffman tables are built from the image's own
    /// symbol statistics instead of the standard tables.
    pub fn write_jpeg<W: Write>(
        &self,
        writer: &mut W,
        quality: u8,
        optimize: bool,
    ) -> Result<()> {
        let (data, color_type) = match &self.image {
            DynamicImage::ImageRgb8(buffer) => (buffer.as_raw(), jpeg_encoder::ColorType::Rgb),
            DynamicImage::ImageLuma8(buffer) => (buffer.as_raw(), jpeg_encoder::ColorType::Luma),
            _ => {
                return Err(BildwerkError::Encode(format!(
                    "{} cannot be stored as baseline JPEG",
                    self.pixel_format()
                )));
            }
        };

        let dims = self.dimensions();
        let (Ok(width), Ok(height)) = (u16::try_from(dims.width), u16::try_from(dims.height))
        else {
            return Err(BildwerkError::Encode(format!(
                "image {dims} exceeds the JPEG limit of 65535 pixels per side"
            )));
        };

        let quality = quality.clamp(1, 100);
        debug!(quality, optimize, "Encoding JPEG");

        let mut encoder = jpeg_encoder::Encoder::new(writer, quality);
        encoder.set_optimized_huffman_tables(optimize);
        encoder
            .encode(data, width, height, color_type)
            .map_err(|err| BildwerkError::Encode(err.to_string()))
    }

    /// Encode the current image as JPEG bytes.
    pub fn to_jpeg_bytes(&self, quality: u8, optimize: bool) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_jpeg(&mut buffer, quality, optimize)?;
        Ok(buffer)
    }

    /// Encode as JPEG and write it to `path`, whatever its extension.
    ///
    /// The file is only created once encoding has succeeded. Returns the
    /// number of bytes written.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), quality = quality))]
    pub fn save_jpeg(
        &self,
        path: impl AsRef<Path>,
        quality: u8,
        optimize: bool,
    ) -> Result<usize> {
        let path = path.as_ref();
        let bytes = self.to_jpeg_bytes(quality, optimize)?;
        std::fs::write(path, &bytes)?;
        info!(bytes = bytes.len(), "JPEG written");
        Ok(bytes.len())
    }
}

/// Map the `image` crate's color type onto our own pixel format.
fn pixel_format(color: ColorType) -> PixelFormat {
    let mode = match (color.has_color(), color.has_alpha()) {
        (false, false) => ColorMode::Gray,
        (false, true) => ColorMode::GrayAlpha,
        (true, false) => ColorMode::Rgb,
        (true, true) => ColorMode::Rgba,
    };
    let depth = match color.bytes_per_pixel() / color.channel_count() {
        1 => SampleDepth::U8,
        2 => SampleDepth::U16,
        _ => SampleDepth::F32,
    };
    PixelFormat::new(mode, depth)
}
