//! Benchmarks for the spritepak codec.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};

use spritepak::handler::{build_palette, MAX_PALETTE};
use spritepak::{Album, Codec, ColorKind, Entity, Version};

/// Gradient sprite so every pixel differs a little.
fn sprite(size: u32, seed: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        Rgba([
            ((x * 4 + seed) % 256) as u8,
            ((y * 4) % 256) as u8,
            (((x + y + seed) * 2) % 256) as u8,
            255,
        ])
    })
}

/// Tiled sprite with at most 64 distinct colours, for palette entities.
fn tiled(size: u32, seed: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        Rgba([(x % 4 * 60) as u8, (y % 4 * 60) as u8, (seed % 4 * 60) as u8, 255])
    })
}

/// Build an album of `count` sprites, adjusted and ready to decode.
fn album(codec: &Codec, version: Version, kind: ColorKind, count: u32, size: u32) -> Album {
    let mut album = Album::new(version);
    for i in 0..count {
        let mut entity = Entity::new(kind).with_location(i as i32, -(i as i32));
        entity.frame_size = (size, size);
        let image = match kind {
            ColorKind::Argb1555 if version == Version::Ver4 => tiled(size, i),
            _ => sprite(size, i),
        };
        entity.replace_image(image);
        album.entities.push(entity);
    }
    if version == Version::Ver4 {
        let images = album.entities.iter().filter_map(|e| e.image());
        album.palette = build_palette(images, MAX_PALETTE).unwrap();
    }
    codec.adjust(&mut album).unwrap();
    album
}

// -- Decoding benchmarks --

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    let codec = Codec::default();

    let small = album(&codec, Version::Ver2, ColorKind::Argb8888, 4, 16);
    let large = album(&codec, Version::Ver2, ColorKind::Argb8888, 64, 64);
    let indexed = album(&codec, Version::Ver4, ColorKind::Argb1555, 16, 8);

    group.bench_function("load_ver2_small", |b| {
        b.iter(|| codec.load(black_box(small.data())).unwrap())
    });

    group.bench_function("load_ver2_large", |b| {
        b.iter(|| codec.load(black_box(large.data())).unwrap())
    });

    group.bench_function("load_ver4_indexed", |b| {
        b.iter(|| codec.load(black_box(indexed.data())).unwrap())
    });

    group.bench_function("render_all_ver2_large", |b| {
        b.iter(|| {
            let mut loaded = codec.load(large.data()).unwrap();
            for i in 0..loaded.len() {
                black_box(codec.image(&mut loaded, i).unwrap());
            }
        })
    });

    group.finish();
}

// -- Adjust benchmarks --

fn bench_adjust(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjust");
    let codec = Codec::default();

    group.bench_function("encode_ver2_argb4444", |b| {
        b.iter(|| album(&codec, Version::Ver2, ColorKind::Argb4444, 16, 32))
    });

    group.bench_function("encode_ver4_indexed", |b| {
        b.iter(|| album(&codec, Version::Ver4, ColorKind::Argb1555, 16, 8))
    });

    let mut clean = album(&codec, Version::Ver1, ColorKind::Argb8888, 32, 32);
    group.bench_function("reframe_ver1_clean", |b| {
        b.iter(|| codec.adjust(black_box(&mut clean)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_decode, bench_adjust);
criterion_main!(benches);
