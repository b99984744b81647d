use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dv_core::Image;
use dv_hough::{CircleDetector, HoughConfig, paint_disc};

fn build_node_canvas(width: usize, height: usize) -> Image<u8> {
    let mut img = Image::new_fill(width, height, 24u8);
    let centers = [(120, 140, 22), (340, 90, 15), (520, 300, 30), (680, 500, 12)];
    for (cx, cy, r) in centers {
        paint_disc(&mut img, cx, cy, r, 225);
    }
    img
}

fn bench_circle_detect(c: &mut Criterion) {
    let img = build_node_canvas(810, 620);
    let view = img.as_view();
    let cfg = HoughConfig {
        max_radius: 310,
        ..HoughConfig::default()
    };
    let mut det = CircleDetector::new();

    c.bench_function("hough_circles_810x620", |b| {
        b.iter(|| {
            let out = det.detect(black_box(&view), black_box(&cfg));
            black_box(out.len());
        });
    });
}

criterion_group!(benches, bench_circle_detect);
criterion_main!(benches);
