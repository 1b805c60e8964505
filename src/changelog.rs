//! Per-page changelog view built from an injected commit history.
//!
//! The history is mined elsewhere (a build step runs `git log` and writes it
//! as JSON); this module only consumes it. [`CommitHistory`] is handed in by
//! the caller, so tests and hosts can supply any sequence of records without a
//! build pipeline.
//!
//! ## Commit JSON
//!
//! ```json
//! [
//!   {
//!     "hash": "4f1c9e0a7d2b...",
//!     "message": "docs: fix typo",
//!     "author_name": "Neko",
//!     "author_email": "neko@example.com",
//!     "date_timestamp": 1704412800000,
//!     "paths": ["pages/en/index.md"],
//!     "tag": "v1.2.0"
//!   }
//! ]
//! ```
//!
//! `author_email`, `paths` and `tag` are optional. The same list may also be
//! wrapped the way the site's build module exports it:
//!
//! ```json
//! { "commits": [ { "hash": "4f1c9e0a7d2b...", "...": "..." } ] }
//! ```

use crate::locale::{LocaleBundle, format_committed_on, format_last_edited};
use crate::time::TimeFormatter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Characters of the hash shown next to each entry.
pub const SHORT_HASH_LEN: usize = 7;

#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One commit as delivered by the history provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub message: String,
    pub author_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_email: Option<String>,
    /// Commit time, Unix milliseconds.
    pub date_timestamp: i64,
    /// Files touched by the commit, relative to the docs root.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
    /// Release tag pointing at this commit, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl CommitRecord {
    pub fn short_hash(&self) -> &str {
        let end = self
            .hash
            .char_indices()
            .nth(SHORT_HASH_LEN)
            .map_or(self.hash.len(), |(i, _)| i);
        &self.hash[..end]
    }

    fn touches(&self, page: &str) -> bool {
        self.paths.iter().any(|p| normalize_path(p) == page)
    }
}

/// Strip leading `./` and `/` so `./guide/a.md`, `/guide/a.md` and
/// `guide/a.md` compare equal.
pub fn normalize_path(path: &str) -> &str {
    let mut path = path;
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else {
            return path;
        }
    }
}

/// All commits known to the site, newest first.
#[derive(Debug, Clone, Default)]
pub struct CommitHistory {
    commits: Vec<CommitRecord>,
}

impl CommitHistory {
    /// Takes ownership of the records and orders them newest first.
    /// Commits sharing a timestamp keep their supplied order.
    pub fn new(mut commits: Vec<CommitRecord>) -> Self {
        commits.sort_by(|a, b| b.date_timestamp.cmp(&a.date_timestamp));
        Self { commits }
    }

    /// Read commit records, either a bare JSON array or `{"commits": [...]}`.
    pub fn load(path: &Path) -> Result<Self, ChangelogError> {
        let content = fs::read_to_string(path)?;
        let commits = match serde_json::from_str(&content)? {
            HistoryFile::List(commits) => commits,
            HistoryFile::Module { commits } => commits,
        };
        Ok(Self::new(commits))
    }

    pub fn commits(&self) -> &[CommitRecord] {
        &self.commits
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Commits touching `page`, newest first.
    pub fn for_page(&self, page: &str) -> Vec<&CommitRecord> {
        let page = normalize_path(page);
        self.commits.iter().filter(|c| c.touches(page)).collect()
    }
}

/// Accepted top-level shapes of a history file.
#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryFile {
    List(Vec<CommitRecord>),
    Module { commits: Vec<CommitRecord> },
}

/// An author with the number of commits they made to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub commits: usize,
}

/// Deduplicate authors, most active first, ties broken by name.
///
/// Commits group by lowercased email. A commit without an email joins the
/// group of an email its author name appears with elsewhere (the smallest, if
/// several), else groups by name alone. Each group shows its most frequent
/// name. The result does not depend on commit order.
pub fn contributors(commits: &[&CommitRecord]) -> Vec<Contributor> {
    let mut email_of_name: BTreeMap<&str, String> = BTreeMap::new();
    for commit in commits {
        if let Some(email) = &commit.author_email {
            let email = email.to_lowercase();
            email_of_name
                .entry(commit.author_name.as_str())
                .and_modify(|known| {
                    if email < *known {
                        *known = email.clone();
                    }
                })
                .or_insert(email);
        }
    }

    let mut groups: BTreeMap<String, (Option<String>, BTreeMap<&str, usize>)> = BTreeMap::new();
    for commit in commits {
        let email = commit
            .author_email
            .as_ref()
            .map(|e| e.to_lowercase())
            .or_else(|| email_of_name.get(commit.author_name.as_str()).cloned());
        let key = match &email {
            Some(e) => format!("email:{e}"),
            None => format!("name:{}", commit.author_name),
        };
        let (_, names) = groups.entry(key).or_insert_with(|| (email, BTreeMap::new()));
        *names.entry(commit.author_name.as_str()).or_default() += 1;
    }

    let mut found: Vec<Contributor> = groups
        .into_values()
        .map(|(email, names)| {
            let name = names
                .iter()
                .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
                .map(|(name, _)| name.to_string())
                .unwrap_or_default();
            Contributor {
                name,
                email,
                commits: names.values().sum(),
            }
        })
        .collect();
    found.sort_by(|a, b| b.commits.cmp(&a.commits).then_with(|| a.name.cmp(&b.name)));
    found
}

/// One commit line, already localized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub short_hash: String,
    pub message: String,
    pub author_name: String,
    /// The bundle's committed-on template with the date filled in.
    pub committed_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Everything the changelog widget displays for one page, in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageChangelog {
    pub page: String,
    /// `None` when the page has no history.
    pub last_edited: Option<String>,
    pub entries: Vec<ChangelogEntry>,
    pub contributors: Vec<Contributor>,
    pub no_logs_label: String,
    pub no_contributors_label: String,
    pub view_full_history_label: String,
}

impl PageChangelog {
    /// The last-edited line, or the bundle's empty-history label.
    pub fn headline(&self) -> &str {
        self.last_edited.as_deref().unwrap_or(&self.no_logs_label)
    }

    pub fn has_history(&self) -> bool {
        !self.entries.is_empty()
    }
}

/// Localize the history of `page` with `bundle`.
///
/// `now_ms` is passed in rather than read from the clock so output is
/// reproducible.
pub fn summarize_page(
    history: &CommitHistory,
    page: &str,
    bundle: &LocaleBundle,
    formatter: &dyn TimeFormatter,
    now_ms: i64,
) -> PageChangelog {
    let locale_tag = bundle.relative_time_locale_tag.as_str();
    let commits = history.for_page(page);

    let last_edited = commits.first().map(|latest| {
        let relative = formatter.relative(locale_tag, latest.date_timestamp, now_ms);
        format_last_edited(bundle, &relative)
    });

    let entries = commits
        .iter()
        .map(|c| ChangelogEntry {
            short_hash: c.short_hash().to_string(),
            message: c.message.clone(),
            author_name: c.author_name.clone(),
            committed_on: format_committed_on(
                bundle,
                &formatter.absolute(locale_tag, c.date_timestamp),
            ),
            tag: c.tag.clone(),
        })
        .collect();

    PageChangelog {
        page: normalize_path(page).to_string(),
        last_edited,
        entries,
        contributors: contributors(&commits),
        no_logs_label: bundle.no_logs_label.clone(),
        no_contributors_label: bundle.no_contributors_label.clone(),
        view_full_history_label: bundle.view_full_history_label.clone(),
    }
}
