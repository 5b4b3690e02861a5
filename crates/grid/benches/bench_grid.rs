use std::hint::black_box;
use std::time::Instant;

use glam::Vec2;
use tessera_common::Rect;
use tessera_grid::SpatialHashGrid;

const WORLD: f32 = 4096.0;

fn make_bounds(count: usize, spacing: f32) -> Vec<Rect> {
    let side = (count as f32).sqrt().ceil() as usize;
    (0..count)
        .map(|i| {
            let x = (i % side) as f32 * spacing;
            let y = (i / side) as f32 * spacing;
            Rect::new(x, y, 16.0, 16.0)
        })
        .collect()
}

fn filled_grid(bounds: &[Rect]) -> SpatialHashGrid<u32> {
    let mut grid = SpatialHashGrid::new(64.0, WORLD, WORLD).expect("valid grid");
    for (i, b) in bounds.iter().enumerate() {
        grid.add(i as u32, b);
    }
    grid
}

fn bench_insert(entity_count: usize, iterations: usize) {
    let bounds = make_bounds(entity_count, 24.0);

    let start = Instant::now();
    for _ in 0..iterations {
        black_box(filled_grid(black_box(&bounds)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  insert ({entity_count} entities, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_update(entity_count: usize, iterations: usize) {
    let mut bounds = make_bounds(entity_count, 24.0);
    let mut grid = filled_grid(&bounds);

    let start = Instant::now();
    for frame in 0..iterations {
        // Every third entity drifts a few units per frame.
        for (i, b) in bounds.iter_mut().enumerate().step_by(3) {
            let dx = if frame % 2 == 0 { 3.0 } else { -3.0 };
            let moved = b.with_origin(b.origin() + Vec2::new(dx, 0.0));
            grid.update(i as u32, b, &moved);
            *b = moved;
        }
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  update ({entity_count} entities, {iterations} frames): {per_iter:?}/frame, total {elapsed:?}"
    );
}

fn bench_query_overlap(entity_count: usize, half: f32, iterations: usize) {
    let grid = filled_grid(&make_bounds(entity_count, 24.0));
    let window = Rect::around(Vec2::splat(WORLD / 4.0), half);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(grid.query_overlap(black_box(&window)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  overlap query ({entity_count} entities, half={half}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_viewport(entity_count: usize, iterations: usize) {
    let grid = filled_grid(&make_bounds(entity_count, 24.0));

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(grid.query_viewport(
            black_box(Vec2::new(100.0, 100.0)),
            black_box(Vec2::new(900.0, 700.0)),
            |h| h % 7 != 0,
        ));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  viewport query ({entity_count} entities, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Spatial Grid Benchmarks ===\n");

    println!("Insert:");
    bench_insert(100, 1000);
    bench_insert(1000, 100);
    bench_insert(10000, 10);

    println!("\nIncremental update:");
    bench_update(1000, 1000);
    bench_update(10000, 100);

    println!("\nOverlap query:");
    bench_query_overlap(10000, 100.0, 10000);
    bench_query_overlap(10000, 400.0, 1000);

    println!("\nViewport query:");
    bench_viewport(1000, 10000);
    bench_viewport(10000, 1000);

    println!("\n=== Done ===");
}
