use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Time source consulted by a [`Bucket`](crate::Bucket) on every add.
///
/// The returned value is the time elapsed since an arbitrary, fixed epoch.
/// Implementations are *not* required to be monotonic: a bucket that observes
/// a time earlier than its last drain resynchronises to it instead of failing.
pub trait Clock {
    /// Returns the current time as a duration since the clock's epoch.
    fn now(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Monotonic clock backed by [`std::time::Instant`], measured from the moment
/// the clock was created.
///
/// This is the default clock of [`Bucket::new`](crate::Bucket::new).
///
/// # Examples
///
/// ```rust
/// use leakybucket::{Bucket, Limit, StdClock};
///
/// let limit = Limit::per_second(100);
/// let bucket = Bucket::with_clock(limit, StdClock::default());
/// assert!(bucket.add().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct StdClock {
    origin: std::time::Instant,
}

impl Default for StdClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Clock for StdClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Wall clock backed by [`SystemTime`], measured from the UNIX epoch.
///
/// The system time can be stepped backwards (NTP corrections, manual changes).
/// Buckets tolerate that, but prefer [`StdClock`] unless wall-clock time is
/// what you actually want to rate limit against.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        // a system time before 1970 reads as the epoch itself
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }
}

/// High-precision clock using the `quanta` crate. Requires the "quanta" feature.
///
/// # Examples
///
/// ```rust
/// # #[cfg(feature = "quanta")]
/// # {
/// use leakybucket::{Bucket, Limit, QuantaClock};
///
/// let bucket = Bucket::with_clock(Limit::per_second(100), QuantaClock::default());
/// assert!(bucket.add().is_ok());
/// # }
/// ```
#[cfg(feature = "quanta")]
#[derive(Clone)]
pub struct QuantaClock {
    clock: quanta::Clock,
    origin: quanta::Instant,
}

#[cfg(feature = "quanta")]
impl Default for QuantaClock {
    fn default() -> Self {
        Self::new(quanta::Clock::new())
    }
}

#[cfg(feature = "quanta")]
impl QuantaClock {
    /// Creates a new `QuantaClock` measuring from the current instant of `clock`.
    pub fn new(clock: quanta::Clock) -> Self {
        let origin = clock.now();
        Self { clock, origin }
    }
}

#[cfg(feature = "quanta")]
impl Clock for QuantaClock {
    fn now(&self) -> Duration {
        self.clock.now() - self.origin
    }
}

/// Coarse clock reading quanta's recent time. Requires the "quanta" feature.
///
/// Reading it is considerably cheaper than [`StdClock`], but it only moves
/// forward as often as quanta's upkeep thread runs. A drain period shorter
/// than the upkeep interval will not be observed accurately.
#[cfg(feature = "quanta")]
#[derive(Clone)]
pub struct FastClock {
    clock: quanta::Clock,
    origin: quanta::Instant,
}

#[cfg(feature = "quanta")]
impl Default for FastClock {
    fn default() -> Self {
        Self::new(quanta::Clock::new())
    }
}

#[cfg(feature = "quanta")]
impl FastClock {
    /// Creates a new `FastClock` from a `quanta::Clock` instance.
    ///
    /// **Important**: Ensure the clock's upkeep thread is running, otherwise
    /// the bucket will never observe time passing and will never drain.
    pub fn new(clock: quanta::Clock) -> Self {
        let origin = clock.recent();
        Self { clock, origin }
    }
}

#[cfg(feature = "quanta")]
impl Clock for FastClock {
    fn now(&self) -> Duration {
        self.clock.recent() - self.origin
    }
}

/// Clock backed by [`tokio::time::Instant`]. Requires the "tokio" feature.
///
/// Follows tokio's paused time in tests, which makes it the natural choice
/// together with the stream adapters in [`futures`](crate::futures).
#[cfg(feature = "tokio")]
#[derive(Debug, Clone)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

#[cfg(feature = "tokio")]
impl Default for TokioClock {
    fn default() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

#[cfg(feature = "tokio")]
impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually driven clock for tests and simulations.
///
/// Time only changes through [`set`](Self::set), [`advance`](Self::advance)
/// and [`rewind`](Self::rewind). The clock is thread-safe; share it with the
/// bucket by reference or through an [`Arc`].
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use leakybucket::{Bucket, Limit, ManualClock};
///
/// let clock = Arc::new(ManualClock::default());
/// let bucket = Bucket::with_clock(Limit::per_second(1), Arc::clone(&clock));
///
/// assert!(bucket.add().is_ok());
/// assert!(bucket.add().is_err());
///
/// clock.advance(Duration::from_secs(1));
/// assert!(bucket.add().is_ok());
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
}

impl ManualClock {
    /// Creates a new manual clock starting at `now`.
    pub fn new(now: Duration) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Sets the current time. Moving backwards is allowed.
    pub fn set(&self, now: Duration) {
        *self.now.lock() = now;
    }

    /// Moves the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now = now.saturating_add(delta);
    }

    /// Moves the clock backward by `delta`, stopping at the epoch.
    pub fn rewind(&self, delta: Duration) {
        let mut now = self.now.lock();
        *now = now.saturating_sub(delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_moves_both_ways() {
        let clock = ManualClock::new(Duration::from_secs(10));
        assert_eq!(Duration::from_secs(10), clock.now());
        clock.advance(Duration::from_millis(1500));
        assert_eq!(Duration::from_millis(11_500), clock.now());
        clock.rewind(Duration::from_secs(2));
        assert_eq!(Duration::from_millis(9_500), clock.now());
        // rewinding past the epoch stops there
        clock.rewind(Duration::from_secs(60));
        assert_eq!(Duration::ZERO, clock.now());
        clock.set(Duration::from_secs(3));
        assert_eq!(Duration::from_secs(3), clock.now());
    }

    #[test]
    fn shared_manual_clock() {
        let clock = Arc::new(ManualClock::default());
        let by_arc: &dyn Clock = &Arc::clone(&clock);
        clock.advance(Duration::from_secs(1));
        assert_eq!(Duration::from_secs(1), by_arc.now());
        assert_eq!(Duration::from_secs(1), (&*clock).now());
    }

    #[test]
    fn std_clock_starts_near_zero() {
        let clock = StdClock::default();
        let first = clock.now();
        let second = clock.now();
        assert!(first < Duration::from_secs(1));
        assert!(second >= first);
    }

    #[test]
    fn system_clock_is_past_the_epoch() {
        assert!(SystemClock.now() > Duration::ZERO);
    }

    #[cfg(feature = "quanta")]
    #[test]
    fn quanta_clock_reads_its_own_clock() {
        let (clock, mock) = quanta::Clock::mock();
        let clock = QuantaClock::new(clock);
        assert_eq!(Duration::ZERO, clock.now());
        mock.increment(Duration::from_secs(10));
        assert_eq!(Duration::from_secs(10), clock.now());
        mock.increment(Duration::from_millis(250));
        assert_eq!(Duration::from_millis(10_250), clock.now());
    }

    #[cfg(feature = "quanta")]
    #[test]
    fn fast_clock_reads_its_own_clock() {
        let (clock, mock) = quanta::Clock::mock();
        let clock = FastClock::new(clock);
        assert_eq!(Duration::ZERO, clock.now());
        mock.increment(Duration::from_secs(3));
        assert_eq!(Duration::from_secs(3), clock.now());
    }
}
