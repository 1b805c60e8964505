//! CLI output formatting for every command.
//!
//! Each command has a `format_*` function returning `Vec<String>` for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.
//!
//! # Output Format
//!
//! ## Resolve
//!
//! ```text
//! zh-Hant → zh (primary subtag)
//!     Shared by: zh, zh-CN, zh-Hans
//!     No logs: 暂无最近变更历史
//!     ...
//! ```
//!
//! ## List
//!
//! ```text
//! Locales (default: en)
//! 001 en, en-US
//!     Последнее редактирование: {{daysAgo}} [ru]
//! 002 zh, zh-CN, zh-Hans
//!     最后编辑于 {{daysAgo}} [zhCN]
//! ```
//!
//! ## Changelog
//!
//! ```text
//! guide/locales.md
//!     最后编辑于 3天前
//!     c3d41b9 docs: explain locale fallback (Neko) 于 2024-01-02 [v1.1.0]
//!     Contributors
//!         Neko (2 commits)
//!     查看完整历史
//! ```

use crate::changelog::PageChangelog;
use crate::config::LocalesConfig;
use crate::locale::{LocaleBundle, LocaleResolver, MatchKind, primary_subtag};
use std::path::Path;
use std::sync::Arc;

/// Longest commit message shown before truncation.
const MAX_MESSAGE_CHARS: usize = 72;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

/// The table key a resolution landed on.
fn matched_tag<'a>(requested: &'a str, kind: MatchKind, default_tag: &'a str) -> &'a str {
    match kind {
        MatchKind::Exact => requested,
        MatchKind::PrimarySubtag => primary_subtag(requested),
        MatchKind::Default => default_tag,
    }
}

fn bundle_lines(bundle: &LocaleBundle, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    vec![
        format!("{pad}No logs: {}", bundle.no_logs_label),
        format!("{pad}No contributors: {}", bundle.no_contributors_label),
        format!("{pad}Last edited: {}", bundle.last_edited_template),
        format!("{pad}Relative time locale: {}", bundle.relative_time_locale_tag),
        format!("{pad}View full history: {}", bundle.view_full_history_label),
        format!("{pad}Committed on: {:?}", bundle.committed_on_template),
    ]
}

// ============================================================================
// resolve
// ============================================================================

pub fn format_resolution(resolver: &LocaleResolver, requested: &str) -> Vec<String> {
    let (kind, bundle) = resolver.resolve_match(requested);
    let matched = matched_tag(requested, kind, resolver.default_tag());
    let shown = if requested.is_empty() { "\"\"" } else { requested };

    let mut lines = vec![format!("{shown} → {matched} ({kind})")];
    let shared = resolver.table().aliases_of(bundle);
    if shared.len() > 1 {
        lines.push(format!("{}Shared by: {}", indent(1), shared.join(", ")));
    }
    lines.extend(bundle_lines(bundle, 1));
    lines
}

pub fn print_resolution(resolver: &LocaleResolver, requested: &str) {
    for line in format_resolution(resolver, requested) {
        println!("{}", line);
    }
}

// ============================================================================
// list
// ============================================================================

pub fn format_table(resolver: &LocaleResolver) -> Vec<String> {
    let mut lines = vec![format!("Locales (default: {})", resolver.default_tag())];
    let groups: Vec<(Arc<LocaleBundle>, Vec<&str>)> = resolver.table().groups();
    for (i, (bundle, tags)) in groups.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), tags.join(", ")));
        lines.push(format!(
            "{}{} [{}]",
            indent(1),
            bundle.last_edited_template,
            bundle.relative_time_locale_tag
        ));
    }
    lines
}

pub fn print_table(resolver: &LocaleResolver) {
    for line in format_table(resolver) {
        println!("{}", line);
    }
}

// ============================================================================
// changelog
// ============================================================================

pub fn format_changelog(summary: &PageChangelog) -> Vec<String> {
    let mut lines = vec![summary.page.clone()];
    lines.push(format!("{}{}", indent(1), summary.headline()));

    for entry in &summary.entries {
        let tag = entry
            .tag
            .as_deref()
            .map(|t| format!(" [{t}]"))
            .unwrap_or_default();
        lines.push(format!(
            "{}{} {} ({}){}{}",
            indent(1),
            entry.short_hash,
            truncate(&entry.message, MAX_MESSAGE_CHARS),
            entry.author_name,
            entry.committed_on,
            tag
        ));
    }

    if summary.contributors.is_empty() {
        lines.push(format!("{}{}", indent(1), summary.no_contributors_label));
    } else {
        lines.push(format!("{}Contributors", indent(1)));
        for c in &summary.contributors {
            let noun = if c.commits == 1 { "commit" } else { "commits" };
            lines.push(format!("{}{} ({} {noun})", indent(2), c.name, c.commits));
        }
    }

    if summary.has_history() {
        lines.push(format!("{}{}", indent(1), summary.view_full_history_label));
    }
    lines
}

pub fn print_changelog(summary: &PageChangelog) {
    for line in format_changelog(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// check
// ============================================================================

/// `source` is `None` when no config file was found and stock defaults apply.
pub fn format_check(config: &LocalesConfig, source: Option<&Path>) -> Vec<String> {
    let origin = match source {
        Some(path) => path.display().to_string(),
        None => "stock defaults".to_string(),
    };
    let bundles: Vec<&str> = config.bundles.keys().map(String::as_str).collect();
    let mut lines = vec![
        format!("Config: {origin}"),
        format!("{}Default: {}", indent(1), config.default_locale),
        format!("{}Bundles: {}", indent(1), bundles.join(", ")),
    ];
    for (alias, target) in &config.aliases {
        lines.push(format!("{}{alias} → {target}", indent(2)));
    }
    lines
}

pub fn print_check(config: &LocalesConfig, source: Option<&Path>) {
    for line in format_check(config, source) {
        println!("{}", line);
    }
}
