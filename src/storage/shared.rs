use std::sync::Arc;

use parking_lot::Mutex;

use super::{BucketState, LevelStorage};

/// Reference counted implementation of [`LevelStorage`]. Cloning the storage,
/// or a bucket using it, yields a handle to the same level.
#[derive(Debug, Clone)]
pub struct SharedStorage(Arc<Mutex<BucketState>>);

impl LevelStorage for SharedStorage {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(BucketState::default())))
    }

    fn update<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut BucketState) -> R,
    {
        f(&mut *self.0.lock())
    }
}
