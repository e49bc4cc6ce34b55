// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: bounding boxes, image dimensions, and pixel formats.

use serde::{Deserialize, Serialize};

use crate::error::{BildwerkError, Result};

/// Largest output size used when the caller does not specify one.
pub const DEFAULT_MAX_SIZE: (u32, u32) = (800, 800);

/// Maximum allowed output dimensions. Both sides are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u32, u32)", into = "(u32, u32)")]
pub struct BoundingBox {
    max_width: u32,
    max_height: u32,
}

impl BoundingBox {
    /// Build a bounding box, rejecting a zero in either dimension.
    pub fn new(max_width: u32, max_height: u32) -> Result<Self> {
        if max_width == 0 || max_height == 0 {
            return Err(BildwerkError::InvalidBoundingBox {
                width: max_width,
                height: max_height,
            });
        }
        Ok(Self {
            max_width,
            max_height,
        })
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_SIZE.0,
            max_height: DEFAULT_MAX_SIZE.1,
        }
    }
}

impl TryFrom<(u32, u32)> for BoundingBox {
    type Error = BildwerkError;

    fn try_from((max_width, max_height): (u32, u32)) -> Result<Self> {
        Self::new(max_width, max_height)
    }
}

impl From<BoundingBox> for (u32, u32) {
    fn from(bounds: BoundingBox) -> Self {
        (bounds.max_width, bounds.max_height)
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.max_width, self.max_height)
    }
}

/// Width and height of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether both sides already fit inside `bounds`.
    pub fn fits_within(&self, bounds: BoundingBox) -> bool {
        self.width <= bounds.max_width && self.height <= bounds.max_height
    }

    /// Thumbnail target size: shrink to fit inside `bounds` while keeping the
    /// aspect ratio, never enlarge.
    ///
    /// The limiting side lands exactly on its bound; the other side is rounded
    /// to the nearest pixel and never drops below 1. Images with a zero side
    /// are returned unchanged.
    pub fn fit_within(self, bounds: BoundingBox) -> Dimensions {
        if self.fits_within(bounds) || self.width == 0 || self.height == 0 {
            return self;
        }

        let (w, h) = (u128::from(self.width), u128::from(self.height));
        let (max_w, max_h) = (
            u128::from(bounds.max_width),
            u128::from(bounds.max_height),
        );

        // w / max_w >= h / max_h, cross-multiplied.
        if w * max_h >= h * max_w {
            let height = div_round(h * max_w, w).max(1);
            Dimensions::new(bounds.max_width, height as u32)
        } else {
            let width = div_round(w * max_h, h).max(1);
            Dimensions::new(width as u32, bounds.max_height)
        }
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn div_round(numerator: u128, denominator: u128) -> u128 {
    (numerator + denominator / 2) / denominator
}

/// Channel layout of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorMode {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl ColorMode {
    pub fn has_alpha(&self) -> bool {
        matches!(self, ColorMode::GrayAlpha | ColorMode::Rgba)
    }
}

/// Storage type of each channel sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleDepth {
    U8,
    U16,
    F32,
}

/// Channel layout plus sample depth, e.g. 8-bit RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelFormat {
    pub mode: ColorMode,
    pub depth: SampleDepth,
}

impl PixelFormat {
    pub const RGB8: PixelFormat = PixelFormat {
        mode: ColorMode::Rgb,
        depth: SampleDepth::U8,
    };
    pub const GRAY8: PixelFormat = PixelFormat {
        mode: ColorMode::Gray,
        depth: SampleDepth::U8,
    };

    pub fn new(mode: ColorMode, depth: SampleDepth) -> Self {
        Self { mode, depth }
    }

    /// Baseline JPEG takes 8-bit gray or 8-bit RGB, nothing else.
    pub fn is_jpeg_compatible(&self) -> bool {
        *self == Self::RGB8 || *self == Self::GRAY8
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.mode {
            ColorMode::Gray => "L",
            ColorMode::GrayAlpha => "LA",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
        };
        let depth = match self.depth {
            SampleDepth::U8 => "8",
            SampleDepth::U16 => "16",
            SampleDepth::F32 => "32F",
        };
        write!(f, "{mode}{depth}")
    }
}
