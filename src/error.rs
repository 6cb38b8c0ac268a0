use std::fmt::{Debug, Display, Formatter};

/// Returned by [`Bucket::add`](crate::Bucket::add) when the bucket is full and
/// the event must be rejected.
///
/// It carries no data. Whether to drop, queue or retry the rejected event is
/// up to the caller, see [`Bucket::retry_after`](crate::Bucket::retry_after).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Overflow;

impl Debug for Overflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Overflow")
    }
}

impl Display for Overflow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "bucket overflow")
    }
}

impl std::error::Error for Overflow {}
