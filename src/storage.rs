pub mod local;
pub mod locked;
pub mod shared;

use std::time::Duration;

use likely_stable::unlikely;
use log::{debug, trace};

use crate::{Limit, Overflow};

/// Storage policy abstraction used by [`Bucket`](crate::Bucket).
///
/// A storage owns one [`BucketState`] and hands out exclusive access to it.
/// Every add runs its drain, capacity check and increment inside a single
/// [`update`](Self::update) call, so implementations shared between threads
/// must serialize those calls.
pub trait LevelStorage {
    /// Create a storage holding an empty, never drained bucket.
    fn new() -> Self;

    /// Run `f` with exclusive access to the state.
    fn update<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut BucketState) -> R;

    /// Snapshot of the current state.
    fn load(&self) -> BucketState {
        self.update(|state| *state)
    }
}

/// Mutable part of a bucket: the current level and when it was last drained.
///
/// The last drain time is a reading of the bucket's [`Clock`](crate::Clock).
/// It starts unset, which counts as infinitely long ago, so the first add
/// always drains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BucketState {
    level: u32,
    last_drain: Option<Duration>,
}

impl BucketState {
    /// Current occupancy of the bucket.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Clock reading of the last drain computation, if any happened yet.
    pub fn last_drain(&self) -> Option<Duration> {
        self.last_drain
    }

    /// Drain if due, then take one slot if there is room.
    pub(crate) fn add(&mut self, limit: &Limit, now: Duration) -> Result<(), Overflow> {
        if self.drain_due(limit, now) {
            self.drain(limit, now);
        }
        if unlikely(self.level >= limit.capacity) {
            trace!("bucket overflow at level {}", self.level);
            return Err(Overflow);
        }
        self.level += 1;
        Ok(())
    }

    /// A drain is due once a full period went by since the last one, when the
    /// clock went backwards, or when the bucket was never drained.
    fn drain_due(&self, limit: &Limit, now: Duration) -> bool {
        match self.last_drain {
            None => true,
            Some(last) => match now.checked_sub(last) {
                Some(elapsed) => elapsed >= limit.drain_period,
                None => true,
            },
        }
    }

    /// Remove `drain_amount` for every whole period elapsed since the last
    /// drain and restart the period at `now`. Partial periods are discarded.
    fn drain(&mut self, limit: &Limit, now: Duration) {
        let periods: u128 = if limit.drain_period.is_zero() {
            1
        } else {
            match self.last_drain {
                None => u128::MAX,
                Some(last) => match now.checked_sub(last) {
                    Some(elapsed) => elapsed.as_nanos() / limit.drain_period.as_nanos(),
                    None => {
                        debug!(
                            "clock moved backwards by {:?}, resynchronizing bucket",
                            last - now
                        );
                        0
                    }
                },
            }
        };
        let drained = periods.saturating_mul(u128::from(limit.drain_amount));
        let level = u128::from(self.level).saturating_sub(drained);
        trace!("drained {periods} period(s), level {} -> {level}", self.level);
        // never above the current level, so it fits
        self.level = level as u32;
        self.last_drain = Some(now);
    }

    /// How long until an add could succeed, without changing any state.
    /// `None` when no amount of waiting frees a slot.
    pub(crate) fn retry_after(&self, limit: &Limit, now: Duration) -> Option<Duration> {
        if limit.capacity == 0 {
            return None;
        }
        if self.level < limit.capacity {
            return Some(Duration::ZERO);
        }
        if limit.drain_amount == 0 {
            return None;
        }
        match self.last_drain {
            None => Some(Duration::ZERO),
            Some(last) => match now.checked_sub(last) {
                Some(elapsed) => Some(limit.drain_period.saturating_sub(elapsed)),
                // the next add resyncs to `now` without draining
                None => Some(limit.drain_period),
            },
        }
    }
}
