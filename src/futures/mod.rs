//! Stream adapters that put a [`Bucket`] in front of a [`Stream`].
//!
//! The bucket itself never waits or retries; these adapters are ready-made
//! caller policies for what to do with items the bucket rejects.

mod shed;
mod throttle;

pub use shed::ShedStream;
pub use throttle::ThrottledStream;

use futures::Stream;

use crate::storage::LevelStorage;
use crate::{Bucket, Clock};

/// Extension methods putting a [`Bucket`] in front of any [`Stream`].
pub trait BucketStreamExt<S, ST, C>
where
    S: Stream,
    ST: LevelStorage,
    C: Clock,
{
    /// Yields items the bucket admits and drops the others.
    fn shed(self, bucket: Bucket<ST, C>) -> ShedStream<S, ST, C>;

    /// Yields every item, holding back rejected ones until the bucket has room.
    fn throttle(self, bucket: Bucket<ST, C>) -> ThrottledStream<S, ST, C>;
}

impl<S, ST, C> BucketStreamExt<S, ST, C> for S
where
    S: Stream,
    ST: LevelStorage,
    C: Clock,
{
    fn shed(self, bucket: Bucket<ST, C>) -> ShedStream<S, ST, C> {
        ShedStream::new(self, bucket)
    }

    fn throttle(self, bucket: Bucket<ST, C>) -> ThrottledStream<S, ST, C> {
        ThrottledStream::new(self, bucket)
    }
}
