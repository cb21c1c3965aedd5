use bordercrop::{Argb, BorderCropper};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};

fn scanned_page(width: u32, height: u32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([250, 250, 248, 255]));
    for y in height / 8..height * 7 / 8 {
        for x in width / 10..width * 9 / 10 {
            if (x / 7 + y / 11) % 3 == 0 {
                img.put_pixel(x, y, Rgba([20, 20, 25, 255]));
            }
        }
    }
    img
}

fn bench_crop(c: &mut Criterion) {
    let page = scanned_page(1240, 1754);

    c.bench_function("determine_base_color", |b| {
        b.iter(|| BorderCropper::determine_base_color(black_box(&page)))
    });

    c.bench_function("scan_a4_150dpi", |b| {
        b.iter(|| BorderCropper::scan(black_box(&page), Argb::rgb(250, 250, 248), 0.05))
    });

    c.bench_function("auto_crop_a4_150dpi", |b| {
        b.iter(|| BorderCropper::auto_crop(black_box(&page), None, 0.05))
    });
}

criterion_group!(benches, bench_crop);
criterion_main!(benches);
