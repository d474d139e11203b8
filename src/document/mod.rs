//! In-memory model of the ledger file.
//!
//! A [`Document`] is an ordered sequence of [`Line`]s. Each line keeps its
//! original terminator, so rendering an untouched document reproduces the
//! source byte for byte. Structure (sections, entries, sub-fields) is not
//! stored here; it is recovered on demand by the [`codec`].
//!
//! ```text
//! Document
//!   └── lines: Vec<Line>
//!         ├── text: String        (without terminator)
//!         └── ending: LineEnding  (Lf | CrLf | None)
//! ```

pub mod codec;
pub mod entry;

pub use codec::{entry_span, LineKind, Span};
pub use entry::{EntryId, EntryRecord, NewEntry, Priority, Status};

use std::fmt;

/// Line terminator as it appeared in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\n`
    #[default]
    Lf,
    /// `\r\n`
    CrLf,
    /// Last line of a file without a trailing newline.
    None,
}

impl LineEnding {
    /// The terminator's bytes.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::None => "",
        }
    }
}

/// A single line of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    text: String,
    ending: LineEnding,
}

impl Line {
    /// Create a line with the given text and terminator.
    #[must_use]
    pub fn new(text: impl Into<String>, ending: LineEnding) -> Self {
        Self {
            text: text.into(),
            ending,
        }
    }

    /// Line content without its terminator.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The line's terminator.
    #[must_use]
    pub fn ending(&self) -> LineEnding {
        self.ending
    }
}

/// The full ledger content as an ordered line sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    lines: Vec<Line>,
    /// Terminator used for lines the engine writes.
    newline: LineEnding,
}

impl Document {
    /// Split `content` into lines, remembering every terminator.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_ledger::document::Document;
    ///
    /// let source = "# TODOs\r\n\r\n## General\n";
    /// let doc = Document::parse(source);
    /// assert_eq!(doc.len(), 3);
    /// assert_eq!(doc.render(), source);
    /// ```
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut newline = None;
        let lines: Vec<Line> = content
            .split_inclusive('\n')
            .map(|raw| {
                let (text, ending) = if let Some(text) = raw.strip_suffix("\r\n") {
                    (text, LineEnding::CrLf)
                } else if let Some(text) = raw.strip_suffix('\n') {
                    (text, LineEnding::Lf)
                } else {
                    (raw, LineEnding::None)
                };
                if newline.is_none() && ending != LineEnding::None {
                    newline = Some(ending);
                }
                Line::new(text, ending)
            })
            .collect();

        Self {
            lines,
            newline: newline.unwrap_or_default(),
        }
    }

    /// Build a document from lines of text using `\n` terminators.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines
                .into_iter()
                .map(|text| Line::new(text, LineEnding::Lf))
                .collect(),
            newline: LineEnding::Lf,
        }
    }

    /// Serialize the document back to text.
    #[must_use]
    pub fn render(&self) -> String {
        let capacity = self
            .lines
            .iter()
            .map(|l| l.text.len() + l.ending.as_str().len())
            .sum();
        let mut out = String::with_capacity(capacity);
        for line in &self.lines {
            out.push_str(&line.text);
            out.push_str(line.ending.as_str());
        }
        out
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the document has no lines at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of line `index`, if it exists.
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(Line::text)
    }

    /// All lines in order.
    #[must_use]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Terminator used for newly written lines.
    #[must_use]
    pub fn newline(&self) -> LineEnding {
        self.newline
    }

    /// Insert lines of text before `index` (or append when `index == len`).
    ///
    /// A preceding line without terminator gets one, so inserted text never
    /// joins onto it.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_lines<I, S>(&mut self, index: usize, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let newline = self.newline;
        let new_lines: Vec<Line> = texts
            .into_iter()
            .map(|text| Line::new(text, newline))
            .collect();
        if new_lines.is_empty() {
            return;
        }
        if index > 0 {
            let prev = &mut self.lines[index - 1];
            if prev.ending == LineEnding::None {
                prev.ending = newline;
            }
        }
        self.lines.splice(index..index, new_lines);
    }

    /// Append lines of text at the end.
    pub fn push_lines<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let end = self.lines.len();
        self.insert_lines(end, texts);
    }

    /// Replace the text of line `index`, keeping its terminator.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn replace_text(&mut self, index: usize, text: impl Into<String>) {
        self.lines[index].text = text.into();
    }

    /// Remove the lines covered by `span` and return them.
    ///
    /// # Panics
    ///
    /// Panics if the span reaches past the end of the document.
    pub fn remove_span(&mut self, span: Span) -> Vec<Line> {
        self.lines.drain(span.start..span.end).collect()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
