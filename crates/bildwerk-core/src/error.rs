// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use thiserror::Error;

/// Top-level error type for all Bildwerk operations.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- Pipeline errors --
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("color conversion failed: {0}")]
    Conversion(String),

    #[error("JPEG encoding failed: {0}")]
    Encode(String),

    #[error("failed to write output: {0}")]
    Write(String),

    // -- Configuration --
    #[error("invalid bounding box {width}x{height}: both sides must be positive")]
    InvalidBoundingBox { width: u32, height: u32 },

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`BildwerkError`], one per pipeline step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input missing, unreadable, or not an image.
    Decode,
    /// Color-mode normalization did not produce an encodable image.
    Conversion,
    /// The JPEG encoder rejected the image.
    Encode,
    /// The output could not be created or written.
    Write,
    /// The caller supplied a zero-sized bounding box.
    InvalidBoundingBox,
}

impl BildwerkError {
    /// Which step of the pipeline produced this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BildwerkError::Decode(_) => ErrorKind::Decode,
            BildwerkError::Conversion(_) => ErrorKind::Conversion,
            BildwerkError::Encode(_) => ErrorKind::Encode,
            BildwerkError::Write(_) | BildwerkError::Io(_) => ErrorKind::Write,
            BildwerkError::InvalidBoundingBox { .. } => ErrorKind::InvalidBoundingBox,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
