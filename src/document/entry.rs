//! Value types for ledger entries.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{LedgerError, Result};

/// Date format used by the `Added:` sub-field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Entry Identifier
// ============================================================================

/// Document-unique identifier of an entry.
///
/// Minted entries carry a random UUID v4 in canonical hyphenated form, but any
/// token without whitespace or `*` is accepted when reading a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Wrap an identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Status
// ============================================================================

/// Completion state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Closed,
}

impl Status {
    /// Checkbox prefix written for this status, including the trailing space.
    #[must_use]
    pub fn marker(self) -> &'static str {
        match self {
            Self::Open => "- [ ] ",
            Self::Closed => "- [x] ",
        }
    }

    /// Status for a checkbox mark character (`' '`, `'x'` or `'X'`).
    #[must_use]
    pub fn from_mark(mark: char) -> Option<Self> {
        match mark {
            ' ' => Some(Self::Open),
            'x' | 'X' => Some(Self::Closed),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_closed(self) -> bool {
        self == Self::Closed
    }
}

impl FromStr for Status {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(LedgerError::validation(
                "status",
                format!("'{other}' is not one of 'open' or 'closed'"),
            )),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.write_str("open"),
            Self::Closed => f.write_str("closed"),
        }
    }
}

// ============================================================================
// Priority
// ============================================================================

/// Entry priority. Absent or unrecognised values become [`Priority::Medium`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Resolve a user-supplied priority, falling back to `Medium`.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_ledger::document::Priority;
    ///
    /// assert_eq!(Priority::normalize(Some("high")), Priority::High);
    /// assert_eq!(Priority::normalize(Some("urgent")), Priority::Medium);
    /// assert_eq!(Priority::normalize(None), Priority::Medium);
    /// ```
    #[must_use]
    pub fn normalize(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::default(),
            Some(raw) => Self::from_str(raw).unwrap_or_else(|()| {
                warn!("Unknown priority '{}', using {}", raw, Self::default());
                Self::default()
            }),
        }
    }
}

impl FromStr for Priority {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, ()> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("High"),
            Self::Medium => f.write_str("Medium"),
            Self::Low => f.write_str("Low"),
        }
    }
}

// ============================================================================
// Insert Request
// ============================================================================

/// Parameters for inserting a new entry.
///
/// # Example
///
/// ```
/// use todo_ledger::document::NewEntry;
///
/// let entry = NewEntry::new("Handle empty input")
///     .with_location("src/parser.rs:42")
///     .with_priority("High")
///     .in_section("Parser");
/// assert_eq!(entry.section.as_deref(), Some("Parser"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEntry {
    pub description: String,
    pub location: Option<String>,
    pub context: Option<String>,
    /// Raw priority text; normalized at insert time.
    pub priority: Option<String>,
    /// Target section; the configured default when `None`.
    pub section: Option<String>,
}

impl NewEntry {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    #[must_use]
    pub fn in_section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }

    /// Trimmed description, rejecting empty or multi-line text.
    pub(crate) fn checked_description(&self) -> Result<String> {
        let description = single_line("description", &self.description)?;
        if description.is_empty() {
            return Err(LedgerError::validation(
                "description",
                "must not be empty",
            ));
        }
        Ok(description)
    }

    pub(crate) fn checked_location(&self) -> Result<Option<String>> {
        optional_field("location", self.location.as_deref())
    }

    pub(crate) fn checked_context(&self) -> Result<Option<String>> {
        optional_field("context", self.context.as_deref())
    }

    pub(crate) fn checked_section(&self) -> Result<Option<String>> {
        optional_field("section", self.section.as_deref())
    }
}

fn single_line(field: &str, value: &str) -> Result<String> {
    if value.contains(['\n', '\r']) {
        return Err(LedgerError::validation(field, "must be a single line"));
    }
    Ok(value.trim().to_string())
}

fn optional_field(field: &str, value: Option<&str>) -> Result<Option<String>> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let value = single_line(field, raw)?;
            Ok((!value.is_empty()).then_some(value))
        }
    }
}

// ============================================================================
// Parsed Entry
// ============================================================================

/// Structured view of one entry block as found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRecord {
    /// Identifier tag, if the checkbox line carries one.
    pub id: Option<EntryId>,
    pub status: Status,
    pub description: String,
    /// Name of the enclosing section, if any header precedes the entry.
    pub section: Option<String>,
    pub priority: Option<Priority>,
    pub location: Option<String>,
    pub context: Option<String>,
    pub added: Option<NaiveDate>,
    /// 1-based line number of the checkbox line.
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_str() {
        assert_eq!("open".parse::<Status>().unwrap(), Status::Open);
        assert_eq!("CLOSED".parse::<Status>().unwrap(), Status::Closed);
        assert_eq!(" Closed ".parse::<Status>().unwrap(), Status::Closed);
    }

    #[test]
    fn test_status_from_str_rejects_unknown() {
        let err = "done".parse::<Status>().unwrap_err();
        assert!(matches!(err, LedgerError::Validation { .. }));
        assert!(err.to_string().contains("done"));
    }

    #[test]
    fn test_status_markers() {
        assert_eq!(Status::Open.marker(), "- [ ] ");
        assert_eq!(Status::Closed.marker(), "- [x] ");
        assert_eq!(Status::from_mark('X'), Some(Status::Closed));
        assert_eq!(Status::from_mark('?'), None);
    }

    #[test]
    fn test_priority_normalize() {
        assert_eq!(Priority::normalize(Some("High")), Priority::High);
        assert_eq!(Priority::normalize(Some("LOW")), Priority::Low);
        assert_eq!(Priority::normalize(Some("")), Priority::Medium);
        assert_eq!(Priority::normalize(Some("critical")), Priority::Medium);
        assert_eq!(Priority::normalize(None), Priority::Medium);
    }

    #[test]
    fn test_new_entry_rejects_empty_description() {
        let err = NewEntry::new("   ").checked_description().unwrap_err();
        assert!(matches!(err, LedgerError::Validation { ref field, .. } if field == "description"));
    }

    #[test]
    fn test_new_entry_rejects_multiline_fields() {
        assert!(NewEntry::new("a\nb").checked_description().is_err());
        assert!(NewEntry::new("ok")
            .with_context("line one\r\nline two")
            .checked_context()
            .is_err());
    }

    #[test]
    fn test_new_entry_blank_optional_fields_are_absent() {
        let entry = NewEntry::new("  Fix it  ")
            .with_location("   ")
            .with_context(" extra ");
        assert_eq!(entry.checked_description().unwrap(), "Fix it");
        assert_eq!(entry.checked_location().unwrap(), None);
        assert_eq!(entry.checked_context().unwrap().as_deref(), Some("extra"));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Status::Closed).unwrap(), "\"closed\"");
    }
}
