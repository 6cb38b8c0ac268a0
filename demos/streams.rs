use std::time::Duration;

use futures::{StreamExt, stream};
use leakybucket::futures::BucketStreamExt;
use leakybucket::{Bucket, Limit, SharedStorage, TokioClock};
use tokio::task::JoinSet;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    env_logger::init();

    // all streams share one bucket: 5 items per second, bursts of 5
    let limit = Limit::new(5, Duration::from_secs(1), 5);
    let bucket = Bucket::<SharedStorage, _>::from_parts(limit, TokioClock::default());

    let start = tokio::time::Instant::now();
    let mut handles = JoinSet::new();
    for i in 1..=4 {
        handles.spawn({
            let bucket = bucket.clone();
            async move {
                let mut items = std::pin::pin!(stream::iter(1..=5).throttle(bucket));
                while let Some(item) = items.next().await {
                    println!("[stream={i}] item: {}, elapsed={:?}", item, start.elapsed());
                }
            }
        });
    }
    handles.join_all().await;
    println!("Completed in {:?}", start.elapsed());

    // the same load against a fresh bucket, dropping what does not fit
    let bucket = Bucket::with_clock(limit, TokioClock::default());
    let mut shed = std::pin::pin!(stream::iter(1..=20).shed(bucket));
    let mut kept = vec![];
    while let Some(item) = shed.next().await {
        kept.push(item);
    }
    println!("kept {kept:?}, dropped {}", shed.rejected());
}
