//! Criterion bench for the block-processing hot path.
//!
//! The per-block budget at 48 kHz / 512 frames is ~10.7 ms; the recurrence
//! should sit several orders of magnitude under that.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use statevf_core::svf::StateVf;

fn bench_process_block(c: &mut Criterion) {
    let mut svf = StateVf::new(48_000.0);
    svf.reset(1000.0);

    let input: Vec<f32> = (0..512).map(|i| ((i as f32) * 0.1).sin()).collect();
    let mut hp = vec![0.0f32; 512];
    let mut bp = vec![0.0f32; 512];
    let mut lp = vec![0.0f32; 512];

    c.bench_function("process_block/512", |b| {
        b.iter(|| {
            svf.process_block(
                black_box(&input),
                black_box(1000.0),
                black_box(0.5),
                &mut hp,
                &mut bp,
                &mut lp,
            );
        })
    });
}

criterion_group!(benches, bench_process_block);
criterion_main!(benches);
