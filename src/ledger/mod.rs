//! Ledger engine: the four ledger operations over one file.
//!
//! Each operation loads the document, applies one mutation in memory and
//! writes the whole file back (Report and listing only read). No state is
//! cached between calls; the file is the only source of truth.
//!
//! ```text
//! Ledger
//!   ├── store: LedgerStore      (load / atomic save / advisory lock)
//!   ├── ids: Box<dyn IdSource>  (fresh identifiers)
//!   └── clock: Box<dyn Clock>   (creation dates)
//! ```
//!
//! # Concurrency
//!
//! Operations are synchronous read-modify-write passes. Cooperating
//! processes are serialized by the store's advisory lock; anything else
//! writing the file (editors, scripts) must be serialized by the caller.

mod placement;
pub mod stamp;

pub use placement::{find_section, plan, section_insert_point, Placement};
pub use stamp::{Clock, IdSource, SystemClock, UuidSource};

use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::config::{LedgerConfig, DEFAULT_SECTION};
use crate::document::codec::{
    classify, entry_span, locate_entry, parse_entries, render_entry, with_status, EntryDraft,
};
use crate::document::{
    Document, EntryId, EntryRecord, LineKind, NewEntry, Priority, Span, Status,
};
use crate::error::{LedgerError, Result};
use crate::report::Report;
use crate::store::LedgerStore;

// ============================================================================
// Document-level Operations
// ============================================================================

/// Insert an open entry built from `entry`, stamped with `id` and `added`.
///
/// Returns the index of the new checkbox line.
pub fn insert_entry(
    doc: &mut Document,
    entry: &NewEntry,
    default_section: &str,
    id: &EntryId,
    added: NaiveDate,
) -> Result<usize> {
    let description = entry.checked_description()?;
    let location = entry.checked_location()?;
    let context = entry.checked_context()?;
    let section = entry
        .checked_section()?
        .unwrap_or_else(|| default_section.trim().to_string());

    let block = render_entry(&EntryDraft {
        id,
        description: &description,
        priority: Priority::normalize(entry.priority.as_deref()),
        location: location.as_deref(),
        context: context.as_deref(),
        added,
    });

    Ok(placement::place_entry(doc, &section, block))
}

/// Index of the checkbox line for `id`.
fn find_entry(doc: &Document, id: &str) -> Result<usize> {
    match locate_entry(doc, id) {
        Ok(Some(index)) => Ok(index),
        Ok(None) => Err(LedgerError::not_found(id)),
        Err(index) => Err(LedgerError::malformed(id, index + 1)),
    }
}

/// Rewrite the checkbox marker of entry `id`.
pub fn set_entry_status(doc: &mut Document, id: &str, status: Status) -> Result<()> {
    let index = find_entry(doc, id)?;
    let line = doc.line(index).unwrap_or_default();
    let updated = with_status(line, status).ok_or_else(|| LedgerError::malformed(id, index + 1))?;
    doc.replace_text(index, updated);
    Ok(())
}

/// Span removed for the entry starting at `start`: the block itself plus
/// one adjacent blank line.
///
/// The trailing blank line is taken unless it sits directly before a section
/// header or separator. In that case the blank line above the entry is taken
/// instead, so exactly one blank line stays in front of the structure.
#[must_use]
pub fn removal_span(doc: &Document, start: usize) -> Option<Span> {
    let mut span = entry_span(doc, start)?;
    let is_blank = |i: usize| doc.line(i).is_some_and(|l| classify(l) == LineKind::Blank);

    if is_blank(span.end) {
        let before_structure = doc
            .line(span.end + 1)
            .is_some_and(|l| classify(l).is_structural());
        if !before_structure {
            span.end += 1;
        } else if span.start > 0 && is_blank(span.start - 1) {
            span.start -= 1;
        }
    }
    Some(span)
}

/// Delete entry `id` and its sub-fields. Returns the removed span.
pub fn remove_entry(doc: &mut Document, id: &str) -> Result<Span> {
    let start = find_entry(doc, id)?;
    let span = removal_span(doc, start).ok_or_else(|| LedgerError::malformed(id, start + 1))?;
    debug!("Removing lines {}..{} for {}", span.start + 1, span.end, id);
    doc.remove_span(span);
    Ok(span)
}

// ============================================================================
// Ledger
// ============================================================================

/// A ledger file plus the sources used to stamp new entries.
pub struct Ledger {
    store: LedgerStore,
    default_section: String,
    template: Document,
    ids: Box<dyn IdSource>,
    clock: Box<dyn Clock>,
}

impl Ledger {
    /// Ledger at `store` with default settings.
    #[must_use]
    pub fn new(store: LedgerStore) -> Self {
        Self {
            store,
            default_section: DEFAULT_SECTION.to_string(),
            template: LedgerConfig::default().template(),
            ids: Box::new(UuidSource),
            clock: Box::new(SystemClock),
        }
    }

    /// Ledger configured for a project directory.
    #[must_use]
    pub fn from_config(config: &LedgerConfig, project_dir: &Path) -> Self {
        let store = LedgerStore::new(config.ledger_path(project_dir)).with_locking(config.lock);
        Self::new(store)
            .with_default_section(&config.default_section)
            .with_template(config.template())
    }

    /// Use a different identifier source.
    #[must_use]
    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Use a different clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Section used when an insert names none.
    #[must_use]
    pub fn with_default_section(mut self, section: impl Into<String>) -> Self {
        self.default_section = section.into();
        self
    }

    /// Skeleton written when the ledger file is created.
    #[must_use]
    pub fn with_template(mut self, template: Document) -> Self {
        self.template = template;
        self
    }

    #[must_use]
    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Write the empty ledger skeleton.
    ///
    /// # Errors
    ///
    /// `Validation` if the file exists and `force` is false.
    pub fn init(&self, force: bool) -> Result<()> {
        let _lock = self.store.lock()?;
        if self.store.exists() && !force {
            return Err(LedgerError::validation(
                "file",
                format!("{} already exists", self.store.path().display()),
            ));
        }
        self.store.save(&self.template)
    }

    /// Insert a new open entry and return its identifier.
    ///
    /// The ledger file is created from the template if it does not exist.
    pub fn insert(&self, entry: &NewEntry) -> Result<EntryId> {
        let id = self.ids.next_id();
        let added = self.clock.today();
        let line = self.store.update_or_create(
            || self.template.clone(),
            |doc| insert_entry(doc, entry, &self.default_section, &id, added),
        )?;
        info!("Added entry {} at line {}", id, line + 1);
        Ok(id)
    }

    /// Mark entry `id` open or closed.
    pub fn set_status(&self, id: &str, status: Status) -> Result<()> {
        self.store
            .update(|doc| set_entry_status(doc, id, status))?;
        info!("Marked {} as {}", id, status);
        Ok(())
    }

    /// Delete entry `id`. Returns the number of lines removed.
    pub fn remove(&self, id: &str) -> Result<usize> {
        let span = self.store.update(|doc| remove_entry(doc, id))?;
        info!("Removed entry {} ({} lines)", id, span.len());
        Ok(span.len())
    }

    /// Aggregate counts by status and location.
    pub fn report(&self) -> Result<Report> {
        Ok(Report::from_document(&self.store.load()?))
    }

    /// Every entry in document order.
    pub fn entries(&self) -> Result<Vec<EntryRecord>> {
        Ok(parse_entries(&self.store.load()?))
    }
}
