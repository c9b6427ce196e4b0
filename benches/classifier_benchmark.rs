use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, RgbImage};
use ndarray::Array1;
use retina::{argmax, softmax, Preprocessor};

fn gradient_image(width: u32, height: u32) -> DynamicImage {
    let mut buf = RgbImage::new(width, height);
    for (x, y, pixel) in buf.enumerate_pixels_mut() {
        *pixel = image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
    }
    DynamicImage::ImageRgb8(buf)
}

fn bench_preprocessing(c: &mut Criterion) {
    let preprocessor = Preprocessor::imagenet();
    let mut group = c.benchmark_group("Preprocessing");

    // Configure sampling
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    let sizes = [
        ("small_256x256", 256, 256),
        ("medium_1024x768", 1024, 768),
        ("large_1920x1080", 1920, 1080),
    ];

    for (name, width, height) in sizes {
        let img = gradient_image(width, height);
        group.bench_function(name, |b| {
            b.iter(|| preprocessor.process(black_box(&img)).unwrap())
        });
    }

    group.finish();
}

fn bench_softmax_argmax(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scoring");
    group.sample_size(50);
    group.warm_up_time(std::time::Duration::from_secs(1));

    // 1000 matches the ImageNet class count
    let widths = [10usize, 100, 1000];

    for width in widths {
        let logits = Array1::from_iter((0..width).map(|i| (i % 17) as f32 * 0.37));
        group.bench_function(format!("softmax_argmax_{}", width), |b| {
            b.iter(|| {
                let probs = softmax(black_box(&logits));
                argmax(&probs).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_preprocessing, bench_softmax_argmax);
criterion_main!(benches);
