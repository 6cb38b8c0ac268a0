use std::time::Duration;

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(3600);

/// Throughput and burst configuration of a [`Bucket`](crate::Bucket).
///
/// The throughput limit is `drain_amount` units every `drain_period`: with a
/// full bucket, that is the rate at which events are admitted again. The burst
/// limit is `capacity`, the number of events admitted back to back before
/// rejections start. A capacity below the drain amount means the throughput
/// limit is never reached.
///
/// Zero is a legal value for every field:
///
/// - `capacity == 0` rejects every event.
/// - `drain_amount == 0` never drains, so the bucket admits `capacity` events
///   in total and then rejects forever.
/// - `drain_period == 0` drains `drain_amount` on every add, which leaves the
///   burst limit as the only constraint.
///
/// The default limit is all zeros and rejects everything.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use leakybucket::Limit;
///
/// // no more than one event every 10 seconds
/// let slow = Limit::new(1, Duration::from_secs(10), 1);
/// assert_eq!(1, slow.capacity());
///
/// // a steady 100 events per minute, with bursts of up to 500
/// let bursty = Limit::per_minute(100).with_capacity(500);
/// assert_eq!(100, bursty.drain_amount());
/// assert_eq!(Duration::from_secs(60), bursty.drain_period());
/// assert_eq!(500, bursty.capacity());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limit {
    pub(crate) drain_amount: u32,
    pub(crate) drain_period: Duration,
    pub(crate) capacity: u32,
}

impl std::fmt::Debug for Limit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Limit(drain={} per {:?}, capacity={})",
            self.drain_amount, self.drain_period, self.capacity
        )
    }
}

impl Limit {
    /// Creates a limit draining `drain_amount` units every `drain_period`, with
    /// a burst limit of `capacity`.
    pub const fn new(drain_amount: u32, drain_period: Duration, capacity: u32) -> Self {
        Self {
            drain_amount,
            drain_period,
            capacity,
        }
    }

    /// `amount` events per second, with a burst limit of one second's worth.
    ///
    /// ```rust
    /// use std::time::Duration;
    ///
    /// use leakybucket::Limit;
    ///
    /// let limit = Limit::per_second(10);
    /// assert_eq!(10, limit.capacity());
    /// assert_eq!(Duration::from_secs(1), limit.drain_period());
    /// ```
    pub const fn per_second(amount: u32) -> Self {
        Self::new(amount, Duration::from_secs(1), amount)
    }

    /// `amount` events per minute, with a burst limit of one minute's worth.
    pub const fn per_minute(amount: u32) -> Self {
        Self::new(amount, MINUTE, amount)
    }

    /// `amount` events per hour, with a burst limit of one hour's worth.
    pub const fn per_hour(amount: u32) -> Self {
        Self::new(amount, HOUR, amount)
    }

    /// Overrides the burst limit.
    pub const fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Maximum level of the bucket, i.e. the burst limit.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Units removed from the level per elapsed drain period.
    pub const fn drain_amount(&self) -> u32 {
        self.drain_amount
    }

    /// Time it takes for one drain to become due. Zero drains on every add.
    pub const fn drain_period(&self) -> Duration {
        self.drain_period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        let limit = Limit::per_hour(3600).with_capacity(10);
        assert_eq!(3600, limit.drain_amount());
        assert_eq!(Duration::from_secs(3600), limit.drain_period());
        assert_eq!(10, limit.capacity());

        assert_eq!(
            Limit::new(5, Duration::from_secs(60), 5),
            Limit::per_minute(5)
        );
    }

    #[test]
    fn default_is_closed() {
        let limit = Limit::default();
        assert_eq!(0, limit.capacity());
        assert_eq!(0, limit.drain_amount());
        assert_eq!(Duration::ZERO, limit.drain_period());
    }

    #[test]
    fn debug_format() {
        let limit = Limit::new(2, Duration::from_millis(1500), 10);
        assert_eq!(
            "Limit(drain=2 per 1.5s, capacity=10)",
            format!("{limit:?}")
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let limit = Limit::per_second(10).with_capacity(50);
        let json = serde_json::to_string(&limit).unwrap();
        let back: Limit = serde_json::from_str(&json).unwrap();
        assert_eq!(limit, back);

        let parsed: Limit = serde_json::from_str(
            r#"{"drain_amount":3,"drain_period":{"secs":2,"nanos":0},"capacity":7}"#,
        )
        .unwrap();
        assert_eq!(Limit::new(3, Duration::from_secs(2), 7), parsed);
    }
}
