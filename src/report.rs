//! Aggregate statistics over a ledger.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::document::codec::parse_entries;
use crate::document::{Document, EntryRecord, Status};

/// Open/closed/total counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub open: usize,
    pub closed: usize,
    pub total: usize,
}

impl StatusCounts {
    fn record(&mut self, status: Status) {
        match status {
            Status::Open => self.open += 1,
            Status::Closed => self.closed += 1,
        }
        self.total += 1;
    }
}

/// Counts for entries sharing one `Location:` value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationStats {
    pub location: String,
    #[serde(flatten)]
    pub counts: StatusCounts,
}

/// Summary of a whole ledger.
///
/// Location rows are ordered by total count, descending; locations with
/// equal totals keep the order in which they first appear in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub totals: StatusCounts,
    pub locations: Vec<LocationStats>,
}

impl Report {
    /// Build a report from parsed entries.
    #[must_use]
    pub fn from_entries(entries: &[EntryRecord]) -> Self {
        let mut totals = StatusCounts::default();
        let mut locations: Vec<LocationStats> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for entry in entries {
            totals.record(entry.status);

            let Some(location) = entry.location.as_deref() else {
                continue;
            };
            let slot = *index.entry(location).or_insert_with(|| {
                locations.push(LocationStats {
                    location: location.to_string(),
                    counts: StatusCounts::default(),
                });
                locations.len() - 1
            });
            locations[slot].counts.record(entry.status);
        }

        // sort_by is stable: ties keep encounter order
        locations.sort_by(|a, b| b.counts.total.cmp(&a.counts.total));

        Self { totals, locations }
    }

    /// Build a report straight from a document.
    #[must_use]
    pub fn from_document(doc: &Document) -> Self {
        Self::from_entries(&parse_entries(doc))
    }

    /// Row for a location, if any entry carries it.
    #[must_use]
    pub fn location(&self, location: &str) -> Option<&LocationStats> {
        self.locations.iter().find(|l| l.location == location)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- TODO Report ---")?;
        writeln!(f, "Total TODOs: {}", self.totals.total)?;
        writeln!(f, "  Open: {}", self.totals.open)?;
        writeln!(f, "  Closed: {}", self.totals.closed)?;
        writeln!(f)?;

        if self.locations.is_empty() {
            writeln!(f, "No location data found for TODOs.")?;
        } else {
            writeln!(f, "TODOs by Location:")?;
            for row in &self.locations {
                writeln!(
                    f,
                    "  - {}: {} (Open: {}, Closed: {})",
                    row.location, row.counts.total, row.counts.open, row.counts.closed
                )?;
            }
        }
        write!(f, "-------------------")
    }
}
