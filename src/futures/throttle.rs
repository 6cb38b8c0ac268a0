use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::Stream;
use log::{trace, warn};
use pin_project_lite::pin_project;
#[cfg(not(feature = "tokio-hrtime"))]
use tokio::time::{Sleep, sleep};
#[cfg(feature = "tokio-hrtime")]
use tokio_hrtime::{Sleep, sleep};

use crate::storage::LevelStorage;
use crate::{Bucket, Clock};

pin_project! {
    /// A stream that holds back items its bucket rejects until they fit.
    ///
    /// On overflow the item is kept and the stream sleeps for
    /// [`Bucket::retry_after`] before offering it again. Items are yielded in
    /// order. If the bucket can never admit anything (zero capacity, or full
    /// and not draining) the item is dropped with a warning instead of waiting
    /// forever.
    ///
    /// Use a [`TokioClock`](crate::TokioClock) (or any clock that follows
    /// real time) so the bucket observes the time slept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(all(feature = "async", feature = "tokio"))]
    /// # {
    /// use futures::{StreamExt, stream};
    /// use leakybucket::futures::BucketStreamExt;
    /// use leakybucket::{Bucket, Limit, TokioClock};
    ///
    /// # async fn example() {
    /// let bucket = Bucket::with_clock(Limit::per_second(10), TokioClock::default());
    /// let mut throttled = std::pin::pin!(stream::iter(0..100).throttle(bucket));
    /// while let Some(item) = throttled.next().await {
    ///     println!("{item}");
    /// }
    /// # }
    /// # }
    /// ```
    pub struct ThrottledStream<S, ST, C>
    where
        S: Stream,
        ST: LevelStorage,
        C: Clock,
    {
        #[pin]
        stream: S,
        bucket: Bucket<ST, C>,
        #[pin]
        delay: Option<Sleep>,
        pending: Option<S::Item>,
        dropped: u64,
    }
}

impl<S, ST, C> ThrottledStream<S, ST, C>
where
    S: Stream,
    ST: LevelStorage,
    C: Clock,
{
    /// Wraps `stream`, passing each item through `bucket`.
    pub fn new(stream: S, bucket: Bucket<ST, C>) -> Self {
        Self {
            stream,
            bucket,
            delay: None,
            pending: None,
            dropped: 0,
        }
    }

    /// The bucket items are throttled by.
    pub fn bucket(&self) -> &Bucket<ST, C> {
        &self.bucket
    }

    /// Number of items dropped because the bucket could never admit them.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl<S, ST, C> Stream for ThrottledStream<S, ST, C>
where
    S: Stream,
    ST: LevelStorage,
    C: Clock,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            if let Some(delay) = this.delay.as_mut().as_pin_mut() {
                ready!(delay.poll(cx));
                this.delay.set(None);
            }

            let item = match this.pending.take() {
                Some(item) => item,
                None => match ready!(this.stream.as_mut().poll_next(cx)) {
                    Some(item) => item,
                    None => return Poll::Ready(None),
                },
            };

            if this.bucket.add().is_ok() {
                return Poll::Ready(Some(item));
            }
            match this.bucket.retry_after() {
                Some(wait) => {
                    trace!("throttled stream waiting {wait:?} for room in the bucket");
                    *this.pending = Some(item);
                    this.delay.set(Some(sleep(wait)));
                }
                None => {
                    *this.dropped += 1;
                    warn!(
                        "dropping item, {:?} can never admit it",
                        this.bucket.limit()
                    );
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // items can be dropped, so no lower bound
        let pending = usize::from(self.pending.is_some());
        let upper = self.stream.size_hint().1;
        (0, upper.and_then(|upper| upper.checked_add(pending)))
    }
}

#[cfg(all(test, not(feature = "tokio-hrtime")))]
mod tests {
    use std::time::Duration;

    use futures::{StreamExt, stream};

    use super::*;
    use crate::futures::BucketStreamExt;
    use crate::storage::local::LocalStorage;
    use crate::storage::shared::SharedStorage;
    use crate::{Limit, TokioClock};

    #[tokio::test(start_paused = true)]
    async fn one_per_period() {
        let start = tokio::time::Instant::now();
        let bucket = Bucket::<LocalStorage, _>::from_parts(
            Limit::new(1, Duration::from_secs(1), 1),
            TokioClock::default(),
        );
        let mut throttled = std::pin::pin!(stream::iter(vec![1, 2, 3, 4, 5]).throttle(bucket));

        let mut results = vec![];
        while let Some(item) = throttled.next().await {
            results.push(item);
        }
        let elapsed = start.elapsed();

        assert_eq!(results, vec![1, 2, 3, 4, 5]);
        assert!(elapsed >= Duration::from_secs(4));
        assert!(elapsed < Duration::from_secs(5));
        assert_eq!(0, throttled.dropped());
    }

    #[tokio::test(start_paused = true)]
    async fn burst_then_wait() {
        let start = tokio::time::Instant::now();
        let bucket = Bucket::<LocalStorage, _>::from_parts(
            Limit::new(2, Duration::from_secs(3), 4),
            TokioClock::default(),
        );
        let results: Vec<_> = stream::iter(1..=8).throttle(bucket).collect().await;
        let elapsed = start.elapsed();

        assert_eq!(results, (1..=8).collect::<Vec<_>>());
        // 4 right away, then 2 every 3 seconds
        assert!(elapsed >= Duration::from_secs(6));
        assert!(elapsed < Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn all_ready_within_capacity() {
        let start = tokio::time::Instant::now();
        let bucket = Bucket::<LocalStorage, _>::from_parts(
            Limit::new(1, Duration::from_secs(60), 10),
            TokioClock::default(),
        );
        let results: Vec<_> = stream::iter(1..=5).throttle(bucket).collect().await;
        assert_eq!(results, vec![1, 2, 3, 4, 5]);
        assert_eq!(Duration::ZERO, start.elapsed());
    }

    #[tokio::test(start_paused = true)]
    async fn never_admitting_bucket_drops() {
        let bucket = Bucket::<LocalStorage, _>::from_parts(
            Limit::new(0, Duration::from_secs(1), 2),
            TokioClock::default(),
        );
        let mut throttled = std::pin::pin!(stream::iter(1..=5).throttle(bucket));
        let mut results = vec![];
        while let Some(item) = throttled.next().await {
            results.push(item);
        }
        assert_eq!(results, vec![1, 2]);
        assert_eq!(3, throttled.dropped());
    }

    #[tokio::test(start_paused = true)]
    async fn streams_sharing_a_bucket() {
        let start = tokio::time::Instant::now();
        let bucket = Bucket::<SharedStorage, _>::from_parts(
            Limit::new(1, Duration::from_secs(1), 2),
            TokioClock::default(),
        );
        let first = stream::iter(0..3).throttle(bucket.clone());
        let second = stream::iter(10..13).throttle(bucket.clone());
        let (a, b): (Vec<_>, Vec<_>) = futures::join!(first.collect(), second.collect());

        assert_eq!(a, vec![0, 1, 2]);
        assert_eq!(b, vec![10, 11, 12]);
        // six items, two right away, one per second after that
        assert!(start.elapsed() >= Duration::from_secs(4));
        assert_eq!(2, bucket.level());
    }
}
