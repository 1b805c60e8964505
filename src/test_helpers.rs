//! Shared test utilities for the changelog-locales test suite.
//!
//! Provides fixture paths, commit builders, and assertions for locale tables.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let history = sample_history();
//! let summary = summarize_page(&history, "guide/intro.md", &bundle, &BasicTimeFormatter, NOW);
//!
//! assert_groups(&table, &[&["en"], &["zh", "zh-CN", "zh-Hans"]]);
//! ```

use std::path::{Path, PathBuf};

use crate::changelog::{CommitHistory, CommitRecord};
use crate::locale::LocaleTable;

// =========================================================================
// Clock
// =========================================================================

/// 2024-01-05T00:00:00Z in Unix milliseconds.
pub const NOW: i64 = 1_704_412_800_000;

/// One day in milliseconds.
pub const DAY: i64 = 24 * 60 * 60 * 1000;

// =========================================================================
// Fixtures
// =========================================================================

/// Absolute path of a file under `fixtures/`.
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

// =========================================================================
// Commit builders
// =========================================================================

/// A commit with no email or tag, touching `paths`.
pub fn commit(hash: &str, author: &str, timestamp: i64, paths: &[&str]) -> CommitRecord {
    CommitRecord {
        hash: hash.to_string(),
        message: format!("update by {author}"),
        author_name: author.to_string(),
        author_email: None,
        date_timestamp: timestamp,
        paths: paths.iter().map(|p| p.to_string()).collect(),
        tag: None,
    }
}

/// Three commits on `guide/intro.md` by two authors, one on `index.md`.
///
/// The newest intro commit is three days before [`NOW`] and tagged `v1.1.0`.
pub fn sample_history() -> CommitHistory {
    let mut latest = commit("9b2e7c41d0", "Ann", NOW - 3 * DAY, &["guide/intro.md"]);
    latest.tag = Some("v1.1.0".into());
    CommitHistory::new(vec![
        commit("1a2b3c4d5e", "Bob", NOW - 10 * DAY, &["./guide/intro.md"]),
        latest,
        commit("7f7f7f7f7f", "Ann", NOW - 20 * DAY, &["guide/intro.md"]),
        commit("0000aaaa11", "Cat", NOW - DAY, &["index.md"]),
    ])
}

// =========================================================================
// Table assertions
// =========================================================================

/// Assert that a table's alias groups match `expected`, in first-tag order.
pub fn assert_groups(table: &LocaleTable, expected: &[&[&str]]) {
    let actual: Vec<Vec<&str>> = table.groups().into_iter().map(|(_, tags)| tags).collect();
    let expected: Vec<Vec<&str>> = expected.iter().map(|g| g.to_vec()).collect();
    assert_eq!(actual, expected, "locale table alias groups mismatch");
}
