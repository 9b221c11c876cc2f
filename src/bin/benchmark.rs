//! Throughput benchmark comparing serial and parallel stepping

use falling_sand::domain::{CoinFlip, FlowEngine, GrainColor, SandGrid};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::time::Instant;

const FILL: f64 = 0.3;
const SEED: u64 = 0xFA11;

fn random_grid(size: usize) -> SandGrid {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut grid = SandGrid::new(size, size);
    let color = GrainColor::new(237, 201, 81);
    for y in 0..size {
        for x in 0..size {
            if rng.random_bool(FILL) {
                // coordinates are in range, placement cannot fail
                let _ = grid.place(x, y, color);
            }
        }
    }
    grid
}

fn bench_serial(size: usize, iterations: u32) -> f64 {
    let mut grid = random_grid(size);
    let mut engine = FlowEngine::new();
    let mut coin = CoinFlip::new(Some(SEED));

    let start = Instant::now();
    for _ in 0..iterations {
        engine.step(&mut grid, &mut coin);
    }
    start.elapsed().as_secs_f64() * 1000.0 / iterations as f64
}

fn bench_parallel(size: usize, iterations: u32) -> f64 {
    let mut grid = random_grid(size);
    let mut engine = FlowEngine::new();
    let mut coin = CoinFlip::new(Some(SEED));

    let start = Instant::now();
    for _ in 0..iterations {
        engine.step_parallel(&mut grid, &mut coin);
    }
    start.elapsed().as_secs_f64() * 1000.0 / iterations as f64
}

fn main() {
    println!("=== Falling Sand Stepping Benchmark ===\n");

    let sizes = [161, 321, 641, 1281];
    let iterations = 50;

    println!(
        "{:>12} {:>12} {:>12} {:>10}",
        "Size", "Serial", "Parallel", "Speedup"
    );
    println!("{:-<50}", "");

    for size in sizes {
        let serial_ms = bench_serial(size, iterations);
        let parallel_ms = bench_parallel(size, iterations);

        println!(
            "{:>12} {:>12.3} {:>12.3} {:>9.1}x",
            format!("{}x{}", size, size),
            serial_ms,
            parallel_ms,
            serial_ms / parallel_ms
        );
    }

    println!("\n=== Throughput at 1281x1281 ===\n");

    let cells = 1281 * 1281;
    let parallel_ms = bench_parallel(1281, iterations);
    println!(
        "Parallel: {:.2} ms/tick, {:.1}M cells/sec",
        parallel_ms,
        (cells as f64) / (parallel_ms / 1000.0) / 1_000_000.0
    );
}
