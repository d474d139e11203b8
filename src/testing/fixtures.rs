//! Temporary ledger files for tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary project directory holding one `TODO.md`.
///
/// Cleaned up when dropped.
pub struct LedgerFixture {
    temp_dir: TempDir,
}

impl LedgerFixture {
    /// Open entry with `Location: fileA`.
    pub const OPEN_ID: &'static str = "0b9e4c1a-5d2f-4e8a-9c3b-7a6d5e4f3a21";
    /// Closed entry with `Location: fileA`.
    pub const CLOSED_ID: &'static str = "c2d7f8e9-1a3b-4c5d-8e6f-9a0b1c2d3e4f";
    /// Open entry without a location.
    pub const PLAIN_ID: &'static str = "5e6f7a8b-9c0d-4e1f-a2b3-c4d5e6f7a8b9";

    /// Two open entries and one closed one under `## General`.
    pub const SAMPLE: &'static str = "\
# TODOs

Tracked work for the project.

---

## General

- [ ] **ID: 0b9e4c1a-5d2f-4e8a-9c3b-7a6d5e4f3a21** — Fix the parser
  - Priority: High
  - Location: fileA
  - Added: 2024-01-01

- [x] **ID: c2d7f8e9-1a3b-4c5d-8e6f-9a0b1c2d3e4f** — Drop the old cache
  - Priority: Low
  - Location: fileA
  - Added: 2024-01-02

- [ ] **ID: 5e6f7a8b-9c0d-4e1f-a2b3-c4d5e6f7a8b9** — Write docs
  - Priority: Medium
  - Added: 2024-01-03

";

    /// Directory without a ledger file.
    ///
    /// # Panics
    ///
    /// Panics if temporary directory creation fails.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Directory whose ledger holds [`Self::SAMPLE`].
    #[must_use]
    pub fn sample() -> Self {
        Self::with_content(Self::SAMPLE)
    }

    /// Directory whose ledger holds `content`.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    pub fn with_content(content: &str) -> Self {
        let fixture = Self::empty();
        std::fs::write(fixture.ledger_path(), content).expect("Failed to write TODO.md");
        fixture
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    #[must_use]
    pub fn ledger_path(&self) -> PathBuf {
        self.temp_dir.path().join("TODO.md")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, Status};
    use crate::report::Report;

    #[test]
    fn test_sample_round_trips() {
        let doc = Document::parse(LedgerFixture::SAMPLE);
        assert_eq!(doc.render(), LedgerFixture::SAMPLE);
    }

    #[test]
    fn test_sample_matches_ids() {
        let entries = crate::document::codec::parse_entries(&Document::parse(LedgerFixture::SAMPLE));
        let ids: Vec<_> = entries
            .iter()
            .map(|e| e.id.as_ref().map(|id| id.as_str().to_string()))
            .collect();
        assert_eq!(
            ids,
            vec![
                Some(LedgerFixture::OPEN_ID.to_string()),
                Some(LedgerFixture::CLOSED_ID.to_string()),
                Some(LedgerFixture::PLAIN_ID.to_string()),
            ]
        );
        assert_eq!(entries[1].status, Status::Closed);
        assert_eq!(Report::from_entries(&entries).totals.total, 3);
    }

    #[test]
    fn test_empty_fixture_has_no_ledger() {
        let fixture = LedgerFixture::empty();
        assert!(fixture.path().is_dir());
        assert!(!fixture.ledger_path().exists());
    }
}
