//! Sources for the values stamped onto new entries.
//!
//! Insert needs a fresh identifier and today's date. Both are side effects,
//! so they sit behind traits that tests replace with deterministic doubles
//! (see [`crate::testing`]).

use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::document::EntryId;

/// Mints identifiers for new entries.
pub trait IdSource {
    /// Return a new, never before returned identifier.
    fn next_id(&self) -> EntryId;
}

/// Supplies the creation date for new entries.
pub trait Clock {
    /// The current local date.
    fn today(&self) -> NaiveDate;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> EntryId {
        EntryId::new(Uuid::new_v4().to_string())
    }
}

/// Wall clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_source_is_canonical_and_unique() {
        let source = UuidSource;
        let a = source.next_id();
        let b = source.next_id();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }
}
