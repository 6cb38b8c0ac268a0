#![doc = include_str!("../README.md")]
//!
//! # Core Components
//!
//! - [`Bucket`] - The leaky bucket with pluggable storage and clock
//! - [`Limit`] - Configuration for the throughput and burst limits
//! - [`Clock`] trait and implementations for time sources
//! - Storage implementations for different concurrency needs
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::Duration;
//!
//! use leakybucket::{Bucket, Limit};
//!
//! // 5 events per second, bursts of up to 20
//! let bucket = Bucket::new(Limit::new(5, Duration::from_secs(1), 20));
//!
//! if bucket.add().is_ok() {
//!     println!("event admitted");
//! } else {
//!     println!("rate limit exceeded, event rejected");
//! }
//! ```

mod bucket;
mod clock;
mod error;
#[cfg(feature = "async")]
pub mod futures;
mod limit;
mod storage;

pub use bucket::Bucket;
#[cfg(feature = "tokio")]
pub use clock::TokioClock;
pub use clock::{Clock, ManualClock, StdClock, SystemClock};
#[cfg(feature = "quanta")]
pub use clock::{FastClock, QuantaClock};
pub use error::*;
#[cfg(feature = "async")]
pub use self::futures::BucketStreamExt;
pub use limit::Limit;

pub use storage::{
    BucketState, LevelStorage, local::LocalStorage, locked::LockedStorage, shared::SharedStorage,
};
