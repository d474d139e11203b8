//! Where Insert puts a new entry block.
//!
//! Existing section: after the last entry block of that section.
//! Missing section: a new header plus the entry, either before the final
//! separator that introduces trailing sections, or appended at the end
//! behind a separator.

use tracing::debug;

use crate::document::codec::{classify, entry_span, is_section_header, HEADING_PREFIX, SEPARATOR};
use crate::document::{Document, LineKind, Span};

/// Chosen insertion point for a new entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Append to the entry list of the section whose header is at `header`.
    InSection { header: usize, at: usize },
    /// Create the section just before the separator at `separator`.
    BeforeSeparator { separator: usize },
    /// Create the section at the end of the document.
    AtEnd,
}

/// Index of the first header line for section `name`.
#[must_use]
pub fn find_section(doc: &Document, name: &str) -> Option<usize> {
    doc.lines()
        .iter()
        .position(|line| is_section_header(line.text(), name))
}

/// Index just past the last entry of the section headed at `header`.
///
/// Leading blank lines are skipped, then entry blocks are walked with
/// [`entry_span`]; a single blank line trailing the last block belongs to
/// it. Walking stops at the first line that is neither an entry nor blank.
#[must_use]
pub fn section_insert_point(doc: &Document, header: usize) -> usize {
    let is_blank = |i: usize| doc.line(i).is_some_and(|l| classify(l) == LineKind::Blank);

    let mut cursor = header + 1;
    while is_blank(cursor) {
        cursor += 1;
    }
    let mut insert_at = cursor;

    loop {
        let Some(line) = doc.line(cursor) else { break };
        match classify(line) {
            LineKind::Entry(_) => {
                let span = entry_span(doc, cursor).unwrap_or(Span {
                    start: cursor,
                    end: cursor + 1,
                });
                cursor = span.end;
            }
            // stray sub-field lines stay attached to the block above them
            LineKind::Field(_) => cursor += 1,
            _ => break,
        }
        insert_at = if is_blank(cursor) { cursor + 1 } else { cursor };
        while is_blank(cursor) {
            cursor += 1;
        }
    }

    insert_at
}

/// Decide where an entry for `section` goes.
#[must_use]
pub fn plan(doc: &Document, section: &str) -> Placement {
    if let Some(header) = find_section(doc, section) {
        return Placement::InSection {
            header,
            at: section_insert_point(doc, header),
        };
    }

    let kinds: Vec<LineKind<'_>> = doc.lines().iter().map(|l| classify(l.text())).collect();
    let is_heading = |k: &LineKind<'_>| matches!(k, LineKind::Heading(_));

    // last separator that still introduces a section; a closing rule doesn't
    let trailing = (0..kinds.len()).rev().find(|&i| {
        kinds[i] == LineKind::Separator && kinds[i + 1..].iter().any(is_heading)
    });

    if let Some(separator) = trailing {
        if kinds[..separator].iter().any(is_heading) {
            return Placement::BeforeSeparator { separator };
        }
    }

    Placement::AtEnd
}

/// Insert a rendered entry `block` into `section`, creating the section when
/// needed. Returns the index of the new entry's checkbox line.
pub fn place_entry(doc: &mut Document, section: &str, block: Vec<String>) -> usize {
    let section = section.trim();
    let placement = plan(doc, section);
    debug!("Placing entry in '{}': {:?}", section, placement);

    let needs_gap = |doc: &Document, at: usize| {
        at > 0 && doc.line(at - 1).is_some_and(|l| classify(l) != LineKind::Blank)
    };

    match placement {
        Placement::InSection { at, .. } => {
            let mut lines = Vec::with_capacity(block.len() + 2);
            if needs_gap(doc, at) {
                lines.push(String::new());
            }
            let entry_at = at + lines.len();
            lines.extend(block);
            lines.push(String::new());
            doc.insert_lines(at, lines);
            entry_at
        }
        Placement::BeforeSeparator { separator } => {
            let mut lines = Vec::with_capacity(block.len() + 4);
            if needs_gap(doc, separator) {
                lines.push(String::new());
            }
            lines.push(format!("{HEADING_PREFIX}{section}"));
            lines.push(String::new());
            let entry_at = separator + lines.len();
            lines.extend(block);
            lines.push(String::new());
            doc.insert_lines(separator, lines);
            entry_at
        }
        Placement::AtEnd => {
            let mut lines = Vec::with_capacity(block.len() + 6);
            if needs_gap(doc, doc.len()) {
                lines.push(String::new());
            }
            let last_content = doc
                .lines()
                .iter()
                .rev()
                .map(|l| classify(l.text()))
                .find(|k| *k != LineKind::Blank);
            if matches!(last_content, Some(kind) if kind != LineKind::Separator) {
                lines.push(SEPARATOR.to_string());
                lines.push(String::new());
            }
            lines.push(format!("{HEADING_PREFIX}{section}"));
            lines.push(String::new());
            let entry_at = doc.len() + lines.len();
            lines.extend(block);
            lines.push(String::new());
            doc.push_lines(lines);
            entry_at
        }
    }
}
