use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dv_core::Image;
use dv_edge::{EdgeMapConfig, EdgeMapDetector};

fn build_panel_u8(width: usize, height: usize) -> Image<u8> {
    let mut data = vec![30u8; width * height];
    for y in 0..height {
        for x in 0..width {
            // Vertical stripes every 48 px, roughly a busy dashboard canvas.
            if (x / 48) % 2 == 0 {
                data[y * width + x] = 210;
            }
        }
    }
    Image::from_vec(width, height, data).expect("valid image")
}

fn bench_edgemap_density(c: &mut Criterion) {
    let img = build_panel_u8(810, 770);
    let view = img.as_view();
    let cfg = EdgeMapConfig::new(40.0, 120.0);
    let mut det = EdgeMapDetector::new();

    c.bench_function("edgemap_density_810x770", |b| {
        b.iter(|| {
            let d = det.density(black_box(&view), black_box(&cfg));
            black_box(d);
        });
    });
}

criterion_group!(benches, bench_edgemap_density);
criterion_main!(benches);
