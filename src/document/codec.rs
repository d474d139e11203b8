//! Entry codec: the line grammar shared by every ledger operation.
//!
//! ```text
//! ## <section>                              Heading
//!                                           Blank
//! - [ ] **ID: <id>** — <description>        Entry
//!   - Priority: <High|Medium|Low>           Field
//!   - Location: <text>                      Field (optional)
//!   - Context: <text>                       Field (optional)
//!   - Added: <YYYY-MM-DD>                   Field
//!                                           Blank
//! ---                                       Separator
//! ```
//!
//! An entry block is its checkbox line plus every directly following field
//! line. [`entry_span`] is the one place that decides where a block ends;
//! insert placement, removal and reporting all walk blocks through it.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use super::entry::{EntryId, EntryRecord, Priority, Status, DATE_FORMAT};
use super::Document;

/// Indentation prefix of a sub-field line.
pub const FIELD_PREFIX: &str = "  - ";

/// Prefix of a section header line.
pub const HEADING_PREFIX: &str = "## ";

/// Horizontal rule separating the preamble and trailing boilerplate.
pub const SEPARATOR: &str = "---";

/// Label written in the identifier tag.
pub const ID_LABEL: &str = "ID";

/// Label used by older ledgers; accepted when reading.
pub const LEGACY_ID_LABEL: &str = "UUID";

pub const PRIORITY_KEY: &str = "Priority";
pub const LOCATION_KEY: &str = "Location";
pub const CONTEXT_KEY: &str = "Context";
pub const ADDED_KEY: &str = "Added";

fn checkbox_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^- \[([ xX])\](?: (.*))?$").expect("valid checkbox regex"))
}

fn id_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\*\*(?:ID|UUID):\s*([^\s*]+)\*\*\s*(?:(?:—|--|-)\s*)?(.*)$")
            .expect("valid id tag regex")
    })
}

// ============================================================================
// Line Classification
// ============================================================================

/// Half-open range of line indices `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Parsed checkbox line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryLine<'a> {
    pub status: Status,
    pub id: Option<&'a str>,
    pub description: &'a str,
}

/// Parsed sub-field line. `key` is `None` for free-form notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    pub key: Option<&'a str>,
    pub value: &'a str,
}

/// Grammatical role of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    /// Section header; carries the section name.
    Heading(&'a str),
    Separator,
    Entry(EntryLine<'a>),
    Field(Field<'a>),
    /// Anything else (title, preamble prose, unrelated markdown).
    Text,
}

impl LineKind<'_> {
    /// True for lines that close a section's entry list.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::Heading(_) | Self::Separator)
    }
}

/// Classify one line of text.
///
/// # Example
///
/// ```
/// use todo_ledger::document::codec::{classify, LineKind};
/// use todo_ledger::document::Status;
///
/// match classify("- [x] **ID: 42** — Ship it") {
///     LineKind::Entry(entry) => {
///         assert_eq!(entry.status, Status::Closed);
///         assert_eq!(entry.id, Some("42"));
///         assert_eq!(entry.description, "Ship it");
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// assert_eq!(classify("## Backlog"), LineKind::Heading("Backlog"));
/// ```
#[must_use]
pub fn classify(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed == SEPARATOR {
        return LineKind::Separator;
    }
    if let Some(name) = trimmed.strip_prefix(HEADING_PREFIX) {
        return LineKind::Heading(name.trim());
    }
    if let Some(entry) = parse_entry_line(line) {
        return LineKind::Entry(entry);
    }
    if let Some(rest) = line.strip_prefix(FIELD_PREFIX) {
        return LineKind::Field(parse_field(rest));
    }
    LineKind::Text
}

fn parse_entry_line(line: &str) -> Option<EntryLine<'_>> {
    let caps = checkbox_re().captures(line)?;
    let status = caps
        .get(1)
        .and_then(|m| m.as_str().chars().next())
        .and_then(Status::from_mark)?;
    let rest = caps.get(2).map_or("", |m| m.as_str());

    let (id, description) = match id_tag_re().captures(rest) {
        Some(tag) => (
            tag.get(1).map(|m| m.as_str()),
            tag.get(2).map_or("", |m| m.as_str()),
        ),
        None => (None, rest),
    };

    Some(EntryLine {
        status,
        id,
        description: description.trim_end(),
    })
}

fn parse_field(rest: &str) -> Field<'_> {
    if let Some((key, value)) = rest.split_once(':') {
        let key = key.trim();
        let is_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if is_key {
            return Field {
                key: Some(key),
                value: value.trim(),
            };
        }
    }
    Field {
        key: None,
        value: rest.trim(),
    }
}

/// True when `line` is the header of section `name` (trimmed comparison).
#[must_use]
pub fn is_section_header(line: &str, name: &str) -> bool {
    line.trim() == format!("{HEADING_PREFIX}{}", name.trim())
}

/// True when `line` carries the identifier tag for `id` anywhere in it.
#[must_use]
pub fn mentions_id(line: &str, id: &str) -> bool {
    [ID_LABEL, LEGACY_ID_LABEL]
        .iter()
        .any(|label| line.contains(&format!("**{label}: {id}**")))
}

// ============================================================================
// Block Boundaries
// ============================================================================

/// Span of the entry block whose checkbox line is at `start`.
///
/// The block covers the checkbox line and every contiguous field line after
/// it. It ends at the first line that is not a field: a blank line, another
/// entry, a heading, a separator, or prose. Returns `None` when `start` is
/// not a checkbox line.
///
/// # Example
///
/// ```
/// use todo_ledger::document::{entry_span, Document, Span};
///
/// let doc = Document::parse("## General\n\n- [ ] **ID: a** — A\n  - Priority: Low\n\n");
/// assert_eq!(entry_span(&doc, 2), Some(Span { start: 2, end: 4 }));
/// assert_eq!(entry_span(&doc, 0), None);
/// ```
#[must_use]
pub fn entry_span(doc: &Document, start: usize) -> Option<Span> {
    let first = doc.line(start)?;
    if !matches!(classify(first), LineKind::Entry(_)) {
        return None;
    }
    let mut end = start + 1;
    while let Some(line) = doc.line(end) {
        if !matches!(classify(line), LineKind::Field(_)) {
            break;
        }
        end += 1;
    }
    Some(Span { start, end })
}

/// Index of the first entry line tagged with `id`.
///
/// Mentions inside other entries' descriptions or inside field lines are
/// references, not tags, and are skipped. Returns `Ok(None)` when no line
/// carries the tag, and `Err(line)` with the 0-based index of the first
/// non-entry line carrying it when no well-formed entry matches.
pub fn locate_entry(doc: &Document, id: &str) -> std::result::Result<Option<usize>, usize> {
    let mut malformed = None;
    for (index, line) in doc.lines().iter().enumerate() {
        let text = line.text();
        match classify(text) {
            LineKind::Entry(entry) if entry.id == Some(id) => return Ok(Some(index)),
            LineKind::Entry(_) | LineKind::Field(_) => {}
            _ => {
                if malformed.is_none() && mentions_id(text, id) {
                    malformed = Some(index);
                }
            }
        }
    }
    malformed.map_or(Ok(None), Err)
}

// ============================================================================
// Structured Parse
// ============================================================================

/// Parse every entry block of a document, in document order.
#[must_use]
pub fn parse_entries(doc: &Document) -> Vec<EntryRecord> {
    let mut records = Vec::new();
    let mut section: Option<String> = None;
    let mut index = 0;

    while index < doc.len() {
        let text = doc.line(index).unwrap_or_default();
        match classify(text) {
            LineKind::Heading(name) => {
                section = Some(name.to_string());
                index += 1;
            }
            LineKind::Entry(entry) => {
                let span = entry_span(doc, index).unwrap_or(Span {
                    start: index,
                    end: index + 1,
                });
                records.push(build_record(doc, span, entry, section.clone()));
                index = span.end;
            }
            _ => index += 1,
        }
    }

    records
}

/// First value of field `key` inside an entry block.
#[must_use]
pub fn field_value<'a>(doc: &'a Document, span: Span, key: &str) -> Option<&'a str> {
    (span.start + 1..span.end)
        .filter_map(|i| doc.line(i))
        .find_map(|line| match classify(line) {
            LineKind::Field(Field {
                key: Some(k),
                value,
            }) if k == key => Some(value),
            _ => None,
        })
}

fn build_record(
    doc: &Document,
    span: Span,
    entry: EntryLine<'_>,
    section: Option<String>,
) -> EntryRecord {
    let non_empty = |key: &str| {
        field_value(doc, span, key)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    EntryRecord {
        id: entry.id.map(EntryId::new),
        status: entry.status,
        description: entry.description.to_string(),
        section,
        priority: field_value(doc, span, PRIORITY_KEY).and_then(|p| p.parse::<Priority>().ok()),
        location: non_empty(LOCATION_KEY),
        context: non_empty(CONTEXT_KEY),
        added: field_value(doc, span, ADDED_KEY)
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok()),
        line: span.start + 1,
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Fields of a freshly minted entry.
#[derive(Debug, Clone, Copy)]
pub struct EntryDraft<'a> {
    pub id: &'a EntryId,
    pub description: &'a str,
    pub priority: Priority,
    pub location: Option<&'a str>,
    pub context: Option<&'a str>,
    pub added: NaiveDate,
}

/// Render an open entry block (without the trailing blank separator).
#[must_use]
pub fn render_entry(draft: &EntryDraft<'_>) -> Vec<String> {
    let mut lines = vec![
        format!(
            "{}**{ID_LABEL}: {}** — {}",
            Status::Open.marker(),
            draft.id,
            draft.description
        ),
        format!("{FIELD_PREFIX}{PRIORITY_KEY}: {}", draft.priority),
    ];
    if let Some(location) = draft.location {
        lines.push(format!("{FIELD_PREFIX}{LOCATION_KEY}: {location}"));
    }
    if let Some(context) = draft.context {
        lines.push(format!("{FIELD_PREFIX}{CONTEXT_KEY}: {context}"));
    }
    lines.push(format!(
        "{FIELD_PREFIX}{ADDED_KEY}: {}",
        draft.added.format(DATE_FORMAT)
    ));
    lines
}

/// Rewrite the checkbox marker of an entry line, keeping everything after it.
///
/// Returns `None` when `line` is not a checkbox line.
#[must_use]
pub fn with_status(line: &str, status: Status) -> Option<String> {
    let caps = checkbox_re().captures(line)?;
    let rest = caps.get(2).map_or("", |m| m.as_str());
    let marker = status.marker();
    if caps.get(2).is_none() {
        return Some(marker.trim_end().to_string());
    }
    Some(format!("{marker}{rest}"))
}
