use parking_lot::Mutex;

use super::{BucketState, LevelStorage};

/// Mutex-guarded implementation of [`LevelStorage`]. This is the default
/// storage and makes the bucket `Sync`.
#[derive(Debug)]
pub struct LockedStorage(Mutex<BucketState>);

impl LevelStorage for LockedStorage {
    fn new() -> Self {
        Self(Mutex::new(BucketState::default()))
    }

    fn update<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut BucketState) -> R,
    {
        f(&mut *self.0.lock())
    }
}
