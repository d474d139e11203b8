//! Testing infrastructure for the ledger.
//!
//! - **Mocks**: deterministic [`IdSource`](crate::ledger::IdSource) and
//!   [`Clock`](crate::ledger::Clock) doubles
//! - **Fixtures**: temporary ledger files with known content (test-only)
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use todo_ledger::ledger::{Clock, IdSource};
//! use todo_ledger::testing::{FixedClock, SequentialIds};
//!
//! let ids = SequentialIds::new("task");
//! assert_eq!(ids.next_id().as_str(), "task-1");
//! assert_eq!(ids.next_id().as_str(), "task-2");
//!
//! let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
//! assert_eq!(clock.today().to_string(), "2024-01-31");
//! ```

#[cfg(test)]
pub mod fixtures;
pub mod mocks;

#[cfg(test)]
pub use fixtures::*;
pub use mocks::*;
