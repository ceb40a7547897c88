//! Repair of state read back from storage.
//!
//! Reducers keep their invariants on every mutation, but a persisted payload
//! may have been written by an older build or edited by hand. Loading runs
//! [`Normalize::normalize`] so those invariants hold before the first read.

/// A state slice that can restore its invariants after deserialization.
pub trait Normalize {
    /// Drop or merge entries that break the slice's invariants.
    ///
    /// Returns how many stored entries were discarded.
    fn normalize(&mut self) -> usize;
}
