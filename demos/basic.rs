use std::time::Duration;

use leakybucket::{Bucket, Limit, ManualClock};

fn main() {
    // 10 events per second, bursts of up to 50
    let clock = ManualClock::default();
    let bucket = Bucket::with_clock(Limit::new(10, Duration::from_secs(1), 50), &clock);

    let mut successes = 0;
    let mut failures = 0;
    let mut offer = |n: usize| {
        for _ in 0..n {
            match bucket.add() {
                Ok(()) => successes += 1,
                Err(_) => failures += 1,
            }
        }
        println!("Successes: {successes}, Failures: {failures}");
    };

    // the first 50 fit, the 51st hits the burst limit
    offer(51);

    // one second later 10 slots have drained, the 11th is rejected
    clock.advance(Duration::from_secs(1));
    offer(11);
}
