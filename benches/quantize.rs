use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swatch_quantizer::{quantize, resample, KernelType, PixelBuffer};

/// Smooth two-axis gradient with a constant blue channel
fn gradient(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&[
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                96,
                255,
            ]);
        }
    }
    data
}

fn benchmark_quantize(c: &mut Criterion) {
    let small = gradient(128, 128);
    c.bench_function("quantize_128x128", |b| {
        b.iter(|| quantize(black_box(&small), 128, 128))
    });

    let large = gradient(640, 480);
    c.bench_function("quantize_640x480_downsampled", |b| {
        b.iter(|| quantize(black_box(&large), 640, 480))
    });
}

fn benchmark_resample(c: &mut Criterion) {
    let pixels = PixelBuffer::new(640, 480, gradient(640, 480)).unwrap();
    for kernel in [KernelType::Lanczos, KernelType::Linear] {
        c.bench_function(&format!("resample_640x480_to_148x111_{:?}", kernel), |b| {
            b.iter(|| resample(black_box(&pixels), 148, 111, kernel))
        });
    }
}

criterion_group!(benches, benchmark_quantize, benchmark_resample);
criterion_main!(benches);
