//! Criterion micro-benchmarks for the throttle controller and a full
//! unthrottled replay pass.

use std::io::Write;
use std::time::{Duration, Instant};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempo_bench::{write_synthetic_log, QUERY_FIELD};
use tempo_core::{Flow, ReplayConfig};
use tempo_replay::{ReplayLoop, ThrottleController};

/// Benchmark: one record/pause/resume cycle against a simulated clock.
fn bench_throttle_cycle(c: &mut Criterion) {
    c.bench_function("throttle_cycle", |b| {
        let start = Instant::now();
        let mut now = start;
        let mut throttle = ThrottleController::new(10_000, now);
        b.iter(|| {
            now += Duration::from_micros(20);
            throttle.record(now);
            if let Some(pause) = throttle.pause(now) {
                now += pause;
            }
            throttle.resume(now);
            black_box(throttle.current_limit());
        });
    });
}

/// Benchmark: replay 10K records with pacing disabled.
fn bench_replay_pass_10k(c: &mut Criterion) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write_synthetic_log(&mut file, 10_000, 4, 42).unwrap();
    file.flush().unwrap();
    let config = ReplayConfig::new(file.path(), QUERY_FIELD).with_params_field("params");

    c.bench_function("replay_pass_10k", |b| {
        b.iter(|| {
            let mut replay = ReplayLoop::new(config.clone()).unwrap();
            let summary = replay
                .run(|query: &str, params: &[String]| {
                    black_box((query.len(), params.len()));
                    Ok(Flow::Continue)
                })
                .unwrap();
            black_box(summary.records);
        });
    });
}

criterion_group!(benches, bench_throttle_cycle, bench_replay_pass_10k);
criterion_main!(benches);
