// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-image — Image normalization for Bildwerk.
//
// Opens an image, converts palette and alpha images to plain RGB, shrinks it
// to fit a bounding box with Lanczos resampling, and re-encodes it as JPEG.

pub mod normalize;
pub mod pipeline;

// Re-export the primary entry points so callers can use `bildwerk_image::process` etc.
pub use normalize::processor::ImageNormalizer;
pub use pipeline::{NormalizeReport, process, process_bytes, process_default, try_process};
