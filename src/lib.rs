//! todo-ledger - a TODO ledger kept in one markdown file
//!
//! Entries live in `## <section>` groups as checkbox lines tagged with a
//! unique identifier, followed by indented sub-field lines:
//!
//! ```text
//! ## General
//!
//! - [ ] **ID: 0b9e4c1a-...** — Handle empty input
//!   - Priority: High
//!   - Location: src/parser.rs:42
//!   - Added: 2024-05-01
//! ```
//!
//! # Architecture
//!
//! - [`document`] - Line model with byte-exact round-trip, plus the entry codec
//! - [`ledger`] - Insert, SetStatus, Remove and Report over one file
//! - [`report`] - Aggregate counts by status and location
//! - [`store`] - Atomic rewrites and advisory locking
//! - [`config`] - Layered configuration loading
//! - [`error`] - Error taxonomy and exit codes
//! - [`testing`] - Deterministic identifier and date sources
//!
//! # Example
//!
//! ```rust,ignore
//! use todo_ledger::{Ledger, LedgerConfig, NewEntry, Status};
//!
//! let config = LedgerConfig::load(".".as_ref())?;
//! let ledger = Ledger::from_config(&config, ".".as_ref());
//!
//! let id = ledger.insert(&NewEntry::new("Handle empty input").in_section("Parser"))?;
//! ledger.set_status(id.as_str(), Status::Closed)?;
//! println!("{}", ledger.report()?);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod ledger;
pub mod report;
pub mod store;
pub mod testing;

// Re-export commonly used types
pub use error::{LedgerError, Result};

pub use config::LedgerConfig;
pub use document::{Document, EntryId, EntryRecord, NewEntry, Priority, Status};
pub use ledger::{Clock, IdSource, Ledger};
pub use report::{LocationStats, Report, StatusCounts};
pub use store::LedgerStore;
