use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use futures::future::try_join_all;
use std::{sync::Arc, time::Duration, time::Instant};
use tokio::runtime::Builder;
use zrank::{Leaderboard, MemoryStore, Order, Result, TimeSource, Window};

struct FixedMockTime {
    secs: i64,
}

impl TimeSource for FixedMockTime {
    fn current_secs(&self) -> i64 {
        self.secs
    }
}

const START: i64 = 1_667_232_000;
const END: i64 = 1_669_823_999;

// Updates applied per benchmark iteration (split across tasks when
// concurrent).
const TOTAL_UPDATES: usize = 4096;

fn leaderboard() -> Leaderboard<MemoryStore, FixedMockTime> {
    Leaderboard::with_clock(
        MemoryStore::new(),
        "zrank:bench",
        START,
        END,
        Duration::from_secs(3600),
        FixedMockTime { secs: START + 1 },
    )
    .unwrap()
}

/// Packs and unpacks composite scores with no store involved.
fn bench_codec(c: &mut Criterion) {
    let window = Window::new(START, END).unwrap();
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(TOTAL_UPDATES as u64));

    group.bench_function(format!("encode/elems/{}", TOTAL_UPDATES), |b| {
        b.iter(|| {
            for value in 0..TOTAL_UPDATES as u64 {
                black_box(window.encode(black_box(value), START + 7).unwrap());
            }
        });
    });

    group.bench_function(format!("decode/elems/{}", TOTAL_UPDATES), |b| {
        b.iter(|| {
            for value in 0..TOTAL_UPDATES as u64 {
                black_box(window.decode(black_box(value as f64 + 0.2591992)).unwrap());
            }
        });
    });

    group.finish();
}

/// Applies updates one after another on a single Tokio worker.
fn bench_update_sequential(c: &mut Criterion) {
    let mut group = c.benchmark_group("update/sequential");
    group.throughput(Throughput::Elements(TOTAL_UPDATES as u64));

    group.bench_function(format!("elems/{}", TOTAL_UPDATES), |b| {
        let rt = Builder::new_multi_thread()
            .enable_all()
            .worker_threads(1)
            .build()
            .unwrap();

        b.to_async(&rt).iter_custom(|iters| async move {
            let start = Instant::now();

            for _ in 0..iters {
                let board = leaderboard();
                for i in 0..TOTAL_UPDATES {
                    let score = board.update((i % 256) as i64, 1).await.unwrap();
                    black_box(score);
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Applies updates from many tasks against one shared leaderboard.
fn bench_update_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("update/contended");
    group.sample_size(10);
    group.sampling_mode(criterion::SamplingMode::Flat);

    for num_tasks in [1, 2, 4, 8, 16, 32, 64] {
        let updates_per_task = TOTAL_UPDATES / num_tasks;

        group.throughput(Throughput::Elements(TOTAL_UPDATES as u64));
        group.bench_function(
            format!("elems/{}/tasks/{}", TOTAL_UPDATES, num_tasks),
            |b| {
                let rt = Builder::new_multi_thread().enable_all().build().unwrap();

                b.to_async(&rt).iter_custom(move |iters| async move {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let board = Arc::new(leaderboard());
                        let mut tasks: Vec<tokio::task::JoinHandle<Result<()>>> =
                            Vec::with_capacity(num_tasks);

                        for task in 0..num_tasks {
                            let board = Arc::clone(&board);
                            tasks.push(tokio::spawn(async move {
                                for _ in 0..updates_per_task {
                                    let score = board.update(task as i64, 1).await?;
                                    black_box(score);
                                }
                                Ok(())
                            }));
                        }

                        for result in try_join_all(tasks).await.unwrap() {
                            result.unwrap();
                        }
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

/// Reads the top of a populated board.
fn bench_ranking_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking_list");
    let rt = Builder::new_current_thread().enable_all().build().unwrap();

    let board = leaderboard();
    rt.block_on(async {
        for id in 0..10_000 {
            board.update(id, (id % 997) as u64).await.unwrap();
        }
    });

    for top_n in [10, 100, 1000] {
        group.throughput(Throughput::Elements(top_n as u64));
        group.bench_function(format!("top/{}", top_n), |b| {
            b.to_async(&rt).iter(|| async {
                black_box(board.ranking_list(top_n, Order::Desc).await.unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_codec,
    bench_update_sequential,
    bench_update_contended,
    bench_ranking_list,
);
criterion_main!(benches);
