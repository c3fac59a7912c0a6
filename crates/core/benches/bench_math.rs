use std::hint::black_box;
use std::time::Instant;

use floating_core::{FlyCamera, FrameInput, Mat4, MoveKeys, Vec3};

fn bench_inverse(iterations: usize) {
    #[rustfmt::skip]
    let m = Mat4::from_rows([
        [1.5, -0.5, 0.25, 4.0],
        [0.0, 2.0, -1.0, 0.5],
        [0.75, 0.0, 1.0, -2.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(black_box(&m).inverse());
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  inverse ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_view(iterations: usize) {
    let pos = Vec3::new(1.0, 2.0, 3.0);
    let dir = Vec3::new(0.3, -0.2, -1.0);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(Mat4::view(black_box(pos), black_box(dir)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  view ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn bench_frame(iterations: usize) {
    let mut camera = FlyCamera::default();
    let input = FrameInput {
        look_delta: (3.0, -1.0),
        movement: MoveKeys {
            forward: true,
            left: true,
            ..MoveKeys::default()
        },
        dt: 1.0 / 60.0,
    };

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(camera.advance(black_box(&input)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  full frame ({iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Camera Math Benchmarks ===\n");

    println!("Matrix:");
    bench_inverse(1_000_000);
    bench_view(1_000_000);

    println!("\nFly camera:");
    bench_frame(100_000);

    println!("\n=== Done ===");
}
