use std::time::Duration;

use leakybucket::{Bucket, FastClock, Limit};

fn main() {
    let clock = quanta::Clock::new();
    // Updates at 1Khz
    let _quanta_thread = quanta::Upkeep::new_with_clock(Duration::from_millis(1), clock.clone())
        .start()
        .unwrap();
    let bucket = Bucket::with_clock(Limit::per_second(10).with_capacity(20), FastClock::new(clock));

    let admitted = (0..30).filter(|_| bucket.add().is_ok()).count();
    println!("admitted {admitted} of 30, level {}", bucket.level());

    // after two seconds the bucket is empty again
    println!("sleeping for 2 seconds...");
    std::thread::sleep(Duration::from_secs(2));
    let admitted = (0..30).filter(|_| bucket.add().is_ok()).count();
    println!("admitted {admitted} of 30, level {}", bucket.level());
}
