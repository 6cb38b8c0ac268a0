use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use leakybucket::{Bucket, Limit};

fn main() {
    env_logger::init();

    // 100 events every 100ms, no bursts above that
    let bucket = Arc::new(Bucket::new(Limit::new(100, Duration::from_millis(100), 100)));
    let admitted = Arc::new(AtomicUsize::new(0));
    let rejected = Arc::new(AtomicUsize::new(0));
    let start = Instant::now();

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let bucket = Arc::clone(&bucket);
            let admitted = Arc::clone(&admitted);
            let rejected = Arc::clone(&rejected);
            std::thread::spawn(move || {
                while start.elapsed() < Duration::from_secs(1) {
                    match bucket.add() {
                        Ok(()) => admitted.fetch_add(1, Ordering::Relaxed),
                        Err(_) => rejected.fetch_add(1, Ordering::Relaxed),
                    };
                    std::thread::sleep(Duration::from_micros(50));
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    println!(
        "admitted {} and rejected {} events in {:?}",
        admitted.load(Ordering::Relaxed),
        rejected.load(Ordering::Relaxed),
        start.elapsed()
    );
}
