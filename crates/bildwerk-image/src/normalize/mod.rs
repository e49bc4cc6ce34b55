// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Normalize module — color-mode conversion, thumbnail resize, JPEG output.

pub mod processor;

pub use processor::ImageNormalizer;
