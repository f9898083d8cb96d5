use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_ean::Ean13;
use rust_ean::synthetic::render_gray_image;
use rust_ean::utils::binarization::{Cutoff, otsu_binarize, otsu_threshold};
use rust_ean::utils::profile::ProfileBuilder;

fn bench_otsu_threshold_line(c: &mut Criterion) {
    let line: Vec<u8> = (0..1920).map(|i| if i % 7 < 3 { 20 } else { 230 }).collect();
    c.bench_function("otsu_threshold_1920", |b| {
        b.iter(|| otsu_threshold(black_box(&line)))
    });
}

fn bench_otsu_binarize_line(c: &mut Criterion) {
    let line: Vec<u8> = (0..1920).map(|i| (i * 37 % 256) as u8).collect();
    c.bench_function("otsu_binarize_1920", |b| {
        b.iter(|| otsu_binarize(black_box(&line)))
    });
}

fn bench_moving_average_binarize_line(c: &mut Criterion) {
    let line: Vec<u8> = (0..1920).map(|i| (i * 37 % 256) as u8).collect();
    c.bench_function("moving_average_binarize_1920", |b| {
        b.iter(|| Cutoff::moving_average(black_box(&line), 100, 0.9).binarize(&line))
    });
}

fn bench_profile_build(c: &mut Criterion) {
    let code: Ean13 = "4006381333931".parse().unwrap();
    let gray = render_gray_image(&code, 4, 192, 764, 480);
    let builder = ProfileBuilder::default();
    c.bench_function("profile_build_764x480", |b| {
        b.iter(|| builder.build(black_box(&gray), black_box(764), black_box(480)))
    });
}

criterion_group!(
    benches,
    bench_otsu_threshold_line,
    bench_otsu_binarize_line,
    bench_moving_average_binarize_line,
    bench_profile_build
);
criterion_main!(benches);
