use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::Stream;
use log::trace;
use pin_project_lite::pin_project;

use crate::storage::LevelStorage;
use crate::{Bucket, Clock};

pin_project! {
    /// A stream that drops the items its bucket rejects.
    ///
    /// Each item of the underlying stream is offered to the bucket once.
    /// Admitted items are yielded, overflowing ones are discarded and counted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "async")]
    /// # {
    /// use futures::{StreamExt, stream};
    /// use leakybucket::futures::BucketStreamExt;
    /// use leakybucket::{Bucket, Limit};
    ///
    /// # futures::executor::block_on(async {
    /// let bucket = Bucket::new(Limit::per_minute(3));
    /// let admitted: Vec<_> = stream::iter(0..10).shed(bucket).collect().await;
    /// assert_eq!(vec![0, 1, 2], admitted);
    /// # });
    /// # }
    /// ```
    pub struct ShedStream<S, ST, C>
    where
        S: Stream,
        ST: LevelStorage,
        C: Clock,
    {
        #[pin]
        stream: S,
        bucket: Bucket<ST, C>,
        rejected: u64,
    }
}

impl<S, ST, C> ShedStream<S, ST, C>
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
            rejected: 0,
        }
    }

    /// The bucket items are offered to.
    pub fn bucket(&self) -> &Bucket<ST, C> {
        &self.bucket
    }

    /// Number of items dropped so far.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }
}

impl<S, ST, C> Stream for ShedStream<S, ST, C>
where
    S: Stream,
    ST: LevelStorage,
    C: Clock,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();
        loop {
            let Some(item) = ready!(this.stream.as_mut().poll_next(cx)) else {
                return Poll::Ready(None);
            };
            if this.bucket.add().is_ok() {
                return Poll::Ready(Some(item));
            }
            *this.rejected += 1;
            trace!("shed stream dropped an item, {} so far", this.rejected);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.stream.size_hint().1)
    }
}
