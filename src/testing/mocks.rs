//! Deterministic stand-ins for the side effects of Insert.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::NaiveDate;

use crate::document::EntryId;
use crate::ledger::{Clock, IdSource};

/// Identifier source yielding `<prefix>-1`, `<prefix>-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    counter: AtomicU32,
}

impl SequentialIds {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            counter: AtomicU32::new(0),
        }
    }

    /// Number of identifiers handed out so far.
    #[must_use]
    pub fn issued(&self) -> u32 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> EntryId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        EntryId::new(format!("{}-{}", self.prefix, n))
    }
}

/// Clock that is always on the same day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    date: NaiveDate,
}

impl FixedClock {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_count_up() {
        let ids = SequentialIds::default();
        assert_eq!(ids.issued(), 0);
        assert_eq!(ids.next_id().as_str(), "id-1");
        assert_eq!(ids.next_id().as_str(), "id-2");
        assert_eq!(ids.issued(), 2);
    }

    #[test]
    fn test_fixed_clock() {
        let date = NaiveDate::from_ymd_opt(2023, 12, 24).unwrap();
        let clock = FixedClock::new(date);
        assert_eq!(clock.today(), date);
        assert_eq!(clock.today(), date);
    }
}
