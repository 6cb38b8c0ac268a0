use std::cell::Cell;

use super::{BucketState, LevelStorage};

/// Non-synchronized implementation of [`LevelStorage`]. This is intended for
/// single threaded scenarios and uses [`Cell`] internally, so a bucket using
/// it cannot be shared between threads.
#[derive(Debug)]
pub struct LocalStorage(Cell<BucketState>);

impl LevelStorage for LocalStorage {
    fn new() -> Self {
        Self(Cell::new(BucketState::default()))
    }

    fn update<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut BucketState) -> R,
    {
        let mut state = self.0.get();
        let result = f(&mut state);
        self.0.set(state);
        result
    }

    fn load(&self) -> BucketState {
        self.0.get()
    }
}
