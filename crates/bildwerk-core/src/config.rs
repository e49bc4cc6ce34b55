// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Normalization settings.

use serde::{Deserialize, Serialize};

use crate::types::BoundingBox;

/// JPEG quality used when the caller does not choose one.
pub const DEFAULT_QUALITY: u8 = 85;

/// Settings for one normalization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Largest allowed output size; aspect ratio is always preserved.
    pub max_size: BoundingBox,
    /// JPEG quality, 1-100.
    pub quality: u8,
    /// Ask the encoder for size optimizations where it supports them.
    pub optimize: bool,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            max_size: BoundingBox::default(),
            quality: DEFAULT_QUALITY,
            optimize: true,
        }
    }
}

impl NormalizeConfig {
    pub fn with_max_size(mut self, max_size: BoundingBox) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the JPEG quality. Clamped to 1-100.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality.clamp(1, 100);
        self
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }
}
