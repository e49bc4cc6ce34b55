// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the bildwerk-image crate. Measures the in-memory
// pipeline (decode, flatten alpha, Lanczos downscale, JPEG encode) on a
// synthetic RGBA PNG, plus the resize step on its own.

use std::io::Cursor;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use bildwerk_core::{BoundingBox, NormalizeConfig};
use bildwerk_image::{ImageNormalizer, process_bytes};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// 1600x1200 RGBA gradient, the typical size of a phone photo after the
/// browser has already shrunk it once.
fn synthetic_photo() -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_fn(1600, 1200, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    }))
}

fn encode_png(img: &DynamicImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .expect("encode fixture");
    buffer.into_inner()
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_process_bytes(c: &mut Criterion) {
    let png = encode_png(&synthetic_photo());
    let config = NormalizeConfig::default();

    c.bench_function("process_bytes (1600x1200 RGBA PNG -> 800x600 JPEG)", |b| {
        b.iter(|| {
            let (jpeg, _report) = process_bytes(black_box(&png), &config).expect("process");
            black_box(jpeg);
        });
    });
}

fn bench_thumbnail(c: &mut Criterion) {
    let img = DynamicImage::ImageRgb8(synthetic_photo().to_rgb8());

    c.bench_function("thumbnail lanczos3 (1600x1200 -> 800x600)", |b| {
        b.iter(|| {
            let out = ImageNormalizer::from_dynamic(black_box(img.clone()))
                .thumbnail(BoundingBox::default());
            black_box(out.into_dynamic());
        });
    });
}

criterion_group!(benches, bench_process_bytes, bench_thumbnail);
criterion_main!(benches);
