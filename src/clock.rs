//! The wall-clock time source used for `lastUpdated`, `createdAt` and id minting.

use chrono::{DateTime, Utc};
use std::fmt::Debug;

/// Provides the current time to the store.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub(crate) use step::StepClock;
