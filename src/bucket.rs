use std::fmt::{Debug, Formatter};
use std::time::Duration;

use crate::storage::locked::LockedStorage;
use crate::storage::{BucketState, LevelStorage};
use crate::{Clock, Limit, Overflow, StdClock};

/// A leaky bucket rate limiter with configurable storage and clock implementations.
///
/// Every admitted event raises the level of the bucket by one. The bucket
/// drains `drain_amount` units per elapsed `drain_period`, and events arriving
/// while the level is at `capacity` are rejected with [`Overflow`]. Draining is
/// computed lazily on each [`add`](Self::add); an idle bucket costs nothing and
/// needs no background task.
///
/// Create one bucket per resource you want to protect.
///
/// # Type Parameters
///
/// - `S`: Storage strategy (default: [`LockedStorage`] for concurrent access)
/// - `C`: Clock implementation (default: [`StdClock`])
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use leakybucket::{Bucket, Limit};
///
/// // 10 events per second, with bursts of up to 50
/// let bucket = Bucket::new(Limit::new(10, Duration::from_secs(1), 50));
///
/// match bucket.add() {
///     Ok(()) => println!("admitted"),
///     Err(overflow) => println!("rejected: {overflow}"),
/// }
/// ```
#[derive(Clone)]
pub struct Bucket<S = LockedStorage, C = StdClock> {
    storage: S,
    clock: C,
    limit: Limit,
}

impl Bucket<LockedStorage, StdClock> {
    /// Creates a thread-safe bucket reading time from a [`StdClock`].
    ///
    /// This is the constructor for most use cases.
    pub fn new(limit: Limit) -> Self {
        Self::from_parts(limit, StdClock::default())
    }
}

impl<C: Clock> Bucket<LockedStorage, C> {
    /// Creates a thread-safe bucket with a custom clock.
    ///
    /// Use this when you need a specific timing source, such as `FastClock` for
    /// cheap time reads or [`ManualClock`](crate::ManualClock) for testing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    ///
    /// use leakybucket::{Bucket, Limit, ManualClock};
    ///
    /// let clock = ManualClock::default();
    /// let bucket = Bucket::with_clock(Limit::per_second(2), &clock);
    /// assert!(bucket.add().is_ok());
    /// assert!(bucket.add().is_ok());
    /// assert!(bucket.add().is_err());
    ///
    /// clock.advance(Duration::from_secs(1));
    /// assert!(bucket.add().is_ok());
    /// ```
    pub fn with_clock(limit: Limit, clock: C) -> Self {
        Self::from_parts(limit, clock)
    }
}

impl<S: LevelStorage, C: Clock> Bucket<S, C> {
    /// Creates a bucket from custom storage and clock implementations.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use leakybucket::{Bucket, Limit, LocalStorage, StdClock};
    ///
    /// // single threaded bucket, no locking involved
    /// let bucket = Bucket::<LocalStorage, _>::from_parts(Limit::per_second(5), StdClock::default());
    /// assert!(bucket.add().is_ok());
    /// ```
    pub fn from_parts(limit: Limit, clock: C) -> Self {
        Self {
            storage: S::new(),
            clock,
            limit,
        }
    }

    /// Attempts to admit one event.
    ///
    /// Drains the bucket first if a drain period elapsed since the last drain,
    /// then takes one slot. The whole operation is atomic with respect to other
    /// callers.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The event is admitted
    /// * `Err(Overflow)` - The bucket is full and the event must be rejected;
    ///   the level is left unchanged
    pub fn add(&self) -> Result<(), Overflow> {
        self.storage.update(|state| {
            let now = self.clock.now();
            state.add(&self.limit, now)
        })
    }

    /// Suggested time to wait before an [`add`](Self::add) could succeed.
    ///
    /// Returns `Some(Duration::ZERO)` if there is room or a drain is already
    /// due, and `None` if waiting can never help: the capacity is zero, or the
    /// bucket is full and never drains. Other callers may take the freed slot
    /// first, so this is advice, not a reservation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::time::Duration;
    ///
    /// use leakybucket::{Bucket, Limit, ManualClock};
    ///
    /// let clock = ManualClock::default();
    /// let bucket = Bucket::with_clock(Limit::per_minute(1), &clock);
    /// bucket.add().unwrap();
    /// assert!(bucket.add().is_err());
    ///
    /// clock.advance(Duration::from_secs(20));
    /// assert_eq!(Some(Duration::from_secs(40)), bucket.retry_after());
    /// ```
    pub fn retry_after(&self) -> Option<Duration> {
        self.storage.update(|state| {
            let now = self.clock.now();
            state.retry_after(&self.limit, now)
        })
    }

    /// Level as of the last completed operation. Pending drains are not
    /// applied.
    pub fn level(&self) -> u32 {
        self.storage.load().level()
    }

    /// Snapshot of the bucket's mutable state.
    pub fn state(&self) -> BucketState {
        self.storage.load()
    }

    /// Returns the limit this bucket was created with.
    pub fn limit(&self) -> &Limit {
        &self.limit
    }
}

impl<S: LevelStorage, C> Debug for Bucket<S, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let state = self.storage.load();
        f.debug_struct("Bucket")
            .field("limit", &self.limit)
            .field("level", &state.level())
            .field("last_drain", &state.last_drain())
            .finish()
    }
}
