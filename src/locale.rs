//! Locale bundles, locale tables, and the resolution fallback ladder.
//!
//! A [`LocaleTable`] maps locale tags (`"en"`, `"zh-CN"`, `"zh-Hans"`) to
//! shared [`LocaleBundle`]s. Aliasing is plain repeated insertion of the same
//! `Arc`, so `"zh-CN"`, `"zh-Hans"` and `"zh"` can all hand back the very same
//! bundle instance.
//!
//! ## Resolution
//!
//! Given a requested tag, the first match wins:
//!
//! ```text
//! 1. exact          table["zh-Hant"]
//! 2. primary subtag table["zh"]        (text before the first '-')
//! 3. default        table[default_tag]
//! ```
//!
//! A requested tag is never an error, however garbled. The only failure is a
//! default tag missing from the table, which breaks the ladder for every
//! future call and is therefore reported as [`LocaleError::MissingDefault`].
//! [`LocaleResolver`] checks that once at construction so the per-page path
//! is infallible.
//!
//! Tables and bundles are immutable after construction and `Send + Sync`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Placeholder substituted by [`format_last_edited`].
pub const DAYS_AGO_PLACEHOLDER: &str = "{{daysAgo}}";
/// Placeholder substituted by [`format_committed_on`].
pub const DATE_PLACEHOLDER: &str = "{{date}}";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocaleError {
    #[error("default locale '{0}' is not present in the locale table")]
    MissingDefault(String),
    #[error("alias '{alias}' points to unknown locale '{target}'")]
    UnknownAliasTarget { alias: String, target: String },
}

/// Display strings for the changelog widget in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocaleBundle {
    /// Shown when a page has no commit history.
    pub no_logs_label: String,
    /// Shown when a page has no contributor data.
    pub no_contributors_label: String,
    /// Template carrying `{{daysAgo}}`, e.g. `"最后编辑于 {{daysAgo}}"`.
    pub last_edited_template: String,
    /// Locale key handed to the relative-time formatter (`"ru"`, `"zhCN"`).
    pub relative_time_locale_tag: String,
    /// Link text pointing at the full history view.
    pub view_full_history_label: String,
    /// Template carrying `{{date}}`, rendered next to each commit.
    pub committed_on_template: String,
}

impl LocaleBundle {
    /// Stock bundle for the `en` and `en-US` tags.
    ///
    /// The site ships Russian wording under these keys, with `ru` as the
    /// relative-time locale.
    pub fn stock_en() -> Self {
        Self {
            no_logs_label: "Нет изменений".to_string(),
            no_contributors_label: "Нет авторов".to_string(),
            last_edited_template: "Последнее редактирование: {{daysAgo}}".to_string(),
            relative_time_locale_tag: "ru".to_string(),
            view_full_history_label: "Просмотреть полную историю".to_string(),
            committed_on_template: " от {{date}}".to_string(),
        }
    }

    /// Stock Simplified Chinese bundle for `zh`, `zh-CN` and `zh-Hans`.
    pub fn stock_zh() -> Self {
        Self {
            no_logs_label: "暂无最近变更历史".to_string(),
            no_contributors_label: "暂无相关贡献者".to_string(),
            last_edited_template: "最后编辑于 {{daysAgo}}".to_string(),
            relative_time_locale_tag: "zhCN".to_string(),
            view_full_history_label: "查看完整历史".to_string(),
            committed_on_template: " 于 {{date}}".to_string(),
        }
    }
}

/// Substitute a relative-time expression (`"3 days ago"`) into the bundle's
/// last-edited template.
pub fn format_last_edited(bundle: &LocaleBundle, relative_time_text: &str) -> String {
    bundle
        .last_edited_template
        .replace(DAYS_AGO_PLACEHOLDER, relative_time_text)
}

/// Substitute an absolute date into the bundle's committed-on template.
///
/// Whitespace around the placeholder is kept verbatim.
pub fn format_committed_on(bundle: &LocaleBundle, absolute_date_text: &str) -> String {
    bundle
        .committed_on_template
        .replace(DATE_PLACEHOLDER, absolute_date_text)
}

/// Case-sensitive mapping from locale tag to a shared bundle.
#[derive(Debug, Clone, Default)]
pub struct LocaleTable {
    entries: BTreeMap<String, Arc<LocaleBundle>>,
}

impl LocaleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock table: one bundle aliased as `en-US` and `en`, one Chinese
    /// bundle aliased as `zh-CN`, `zh-Hans` and `zh`.
    pub fn stock() -> Self {
        let mut table = Self::new();
        let en = Arc::new(LocaleBundle::stock_en());
        for tag in ["en-US", "en"] {
            table.insert(tag, Arc::clone(&en));
        }
        let zh = Arc::new(LocaleBundle::stock_zh());
        for tag in ["zh-CN", "zh-Hans", "zh"] {
            table.insert(tag, Arc::clone(&zh));
        }
        table
    }

    /// Insert (or replace) the bundle for `tag`.
    pub fn insert(&mut self, tag: impl Into<String>, bundle: Arc<LocaleBundle>) {
        self.entries.insert(tag.into(), bundle);
    }

    /// Point `alias` at the bundle already registered under `target`.
    pub fn insert_alias(
        &mut self,
        alias: impl Into<String>,
        target: &str,
    ) -> Result<(), LocaleError> {
        let alias = alias.into();
        let bundle = self
            .entries
            .get(target)
            .cloned()
            .ok_or_else(|| LocaleError::UnknownAliasTarget {
                alias: alias.clone(),
                target: target.to_string(),
            })?;
        self.entries.insert(alias, bundle);
        Ok(())
    }

    pub fn get(&self, tag: &str) -> Option<&Arc<LocaleBundle>> {
        self.entries.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All tags, sorted.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every tag that shares this exact bundle instance, sorted.
    pub fn aliases_of(&self, bundle: &Arc<LocaleBundle>) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, b)| Arc::ptr_eq(b, bundle))
            .map(|(tag, _)| tag.as_str())
            .collect()
    }

    /// Tags grouped by shared bundle instance, in first-tag order.
    pub fn groups(&self) -> Vec<(Arc<LocaleBundle>, Vec<&str>)> {
        let mut groups: Vec<(Arc<LocaleBundle>, Vec<&str>)> = Vec::new();
        for (tag, bundle) in &self.entries {
            match groups.iter_mut().find(|(b, _)| Arc::ptr_eq(b, bundle)) {
                Some((_, tags)) => tags.push(tag.as_str()),
                None => groups.push((Arc::clone(bundle), vec![tag.as_str()])),
            }
        }
        groups
    }
}

/// The language portion of a tag: everything before the first `-`.
///
/// - `"zh-Hant"` → `"zh"`
/// - `"en"` → `"en"`
/// - `""` → `""`
pub fn primary_subtag(tag: &str) -> &str {
    tag.split_once('-').map_or(tag, |(lang, _)| lang)
}

/// Which rung of the fallback ladder produced a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    PrimarySubtag,
    Default,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::PrimarySubtag => write!(f, "primary subtag"),
            Self::Default => write!(f, "default"),
        }
    }
}

fn lookup<'a>(
    requested_tag: &str,
    table: &'a LocaleTable,
) -> Option<(MatchKind, &'a Arc<LocaleBundle>)> {
    if let Some(bundle) = table.get(requested_tag) {
        return Some((MatchKind::Exact, bundle));
    }
    table
        .get(primary_subtag(requested_tag))
        .map(|bundle| (MatchKind::PrimarySubtag, bundle))
}

/// Resolve `requested_tag` against `table`, falling back to `default_tag`.
///
/// Fails only when `default_tag` is not a key of `table`, whether or not the
/// requested tag would have matched.
pub fn resolve<'a>(
    requested_tag: &str,
    table: &'a LocaleTable,
    default_tag: &str,
) -> Result<&'a Arc<LocaleBundle>, LocaleError> {
    let default_bundle = table
        .get(default_tag)
        .ok_or_else(|| LocaleError::MissingDefault(default_tag.to_string()))?;
    Ok(lookup(requested_tag, table).map_or(default_bundle, |(_, bundle)| bundle))
}

/// A locale table paired with a default tag known to be present.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    table: LocaleTable,
    default_tag: String,
    default_bundle: Arc<LocaleBundle>,
}

impl LocaleResolver {
    /// Fails with [`LocaleError::MissingDefault`] if `default_tag` is not in `table`.
    pub fn new(table: LocaleTable, default_tag: impl Into<String>) -> Result<Self, LocaleError> {
        let default_tag = default_tag.into();
        let default_bundle = table
            .get(&default_tag)
            .cloned()
            .ok_or_else(|| LocaleError::MissingDefault(default_tag.clone()))?;
        Ok(Self {
            table,
            default_tag,
            default_bundle,
        })
    }

    /// Stock table with `en` as the default.
    pub fn stock() -> Self {
        let table = LocaleTable::stock();
        let default_bundle = Arc::clone(&table.entries["en"]);
        Self {
            table,
            default_tag: "en".to_string(),
            default_bundle,
        }
    }

    pub fn resolve(&self, requested_tag: &str) -> &Arc<LocaleBundle> {
        self.resolve_match(requested_tag).1
    }

    /// Like [`resolve`](Self::resolve), also reporting which rung matched.
    pub fn resolve_match(&self, requested_tag: &str) -> (MatchKind, &Arc<LocaleBundle>) {
        lookup(requested_tag, &self.table).unwrap_or((MatchKind::Default, &self.default_bundle))
    }

    pub fn table(&self) -> &LocaleTable {
        &self.table
    }

    pub fn default_tag(&self) -> &str {
        &self.default_tag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::assert_groups;

    fn reference_table() -> LocaleTable {
        let mut table = LocaleTable::new();
        table.insert("en", Arc::new(LocaleBundle::stock_en()));
        table.insert("zh-CN", Arc::new(LocaleBundle::stock_zh()));
        table.insert_alias("zh", "zh-CN").unwrap();
        table
    }

    #[test]
    fn primary_subtag_splits_on_first_dash() {
        assert_eq!(primary_subtag("zh-Hant-TW"), "zh");
        assert_eq!(primary_subtag("en"), "en");
        assert_eq!(primary_subtag(""), "");
        assert_eq!(primary_subtag("-US"), "");
    }

    #[test]
    fn primary_subtag_ignores_underscores() {
        assert_eq!(primary_subtag("en_US"), "en_US");
    }

    #[test]
    fn exact_match_wins() {
        let table = reference_table();
        let bundle = resolve("zh-CN", &table, "en").unwrap();
        assert!(Arc::ptr_eq(bundle, table.get("zh-CN").unwrap()));
    }

    #[test]
    fn unseen_region_falls_back_to_language() {
        let table = reference_table();
        let bundle = resolve("zh-Hant", &table, "en").unwrap();
        assert!(Arc::ptr_eq(bundle, table.get("zh").unwrap()));
        assert_eq!(bundle.relative_time_locale_tag, "zhCN");
    }

    #[test]
    fn unknown_language_uses_default() {
        let table = reference_table();
        let bundle = resolve("fr-FR", &table, "en").unwrap();
        assert!(Arc::ptr_eq(bundle, table.get("en").unwrap()));
    }

    #[test]
    fn empty_tag_uses_default() {
        let table = reference_table();
        let bundle = resolve("", &table, "en").unwrap();
        assert!(Arc::ptr_eq(bundle, table.get("en").unwrap()));
    }

    #[test]
    fn tags_are_case_sensitive() {
        let table = reference_table();
        let bundle = resolve("ZH-cn", &table, "en").unwrap();
        assert!(Arc::ptr_eq(bundle, table.get("en").unwrap()));
    }

    #[test]
    fn missing_default_is_error() {
        let table = reference_table();
        let err = resolve("fr", &table, "de").unwrap_err();
        assert_eq!(err, LocaleError::MissingDefault("de".into()));
    }

    #[test]
    fn missing_default_is_error_even_when_request_matches() {
        let table = reference_table();
        assert_eq!(
            resolve("en", &table, "missing").unwrap_err(),
            LocaleError::MissingDefault("missing".into())
        );
        assert!(resolve("zh-TW", &table, "de").is_err());
    }

    #[test]
    fn resolver_rejects_missing_default() {
        let err = LocaleResolver::new(reference_table(), "ja").unwrap_err();
        assert_eq!(err.to_string(), "default locale 'ja' is not present in the locale table");
    }

    #[test]
    fn resolver_reports_match_kind() {
        let resolver = LocaleResolver::new(reference_table(), "en").unwrap();
        assert_eq!(resolver.resolve_match("zh-CN").0, MatchKind::Exact);
        assert_eq!(resolver.resolve_match("zh-Hant").0, MatchKind::PrimarySubtag);
        assert_eq!(resolver.resolve_match("fr").0, MatchKind::Default);
        assert_eq!(resolver.resolve_match("").0, MatchKind::Default);
    }

    #[test]
    fn resolver_is_reference_stable() {
        let resolver = LocaleResolver::stock();
        let a = resolver.resolve("zh-Hans");
        let b = resolver.resolve("zh-Hans");
        assert!(Arc::ptr_eq(a, b));
    }

    #[test]
    fn stock_table_aliases_share_one_bundle() {
        let table = LocaleTable::stock();
        let zh = table.get("zh").unwrap();
        assert_eq!(table.aliases_of(zh), vec!["zh", "zh-CN", "zh-Hans"]);
        let en = table.get("en").unwrap();
        assert_eq!(table.aliases_of(en), vec!["en", "en-US"]);
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn stock_bundles_carry_site_strings() {
        let table = LocaleTable::stock();
        let en = table.get("en-US").unwrap();
        assert_eq!(en.no_logs_label, "Нет изменений");
        assert_eq!(en.relative_time_locale_tag, "ru");
        let zh = table.get("zh-CN").unwrap();
        assert_eq!(format_committed_on(zh, "2024-01-05"), " 于 2024-01-05");
    }

    #[test]
    fn groups_collect_aliases() {
        assert_groups(&LocaleTable::stock(), &[&["en", "en-US"], &["zh", "zh-CN", "zh-Hans"]]);
    }

    #[test]
    fn alias_to_unknown_target_is_error() {
        let mut table = LocaleTable::new();
        let err = table.insert_alias("pt-BR", "pt").unwrap_err();
        assert_eq!(
            err,
            LocaleError::UnknownAliasTarget {
                alias: "pt-BR".into(),
                target: "pt".into()
            }
        );
        assert!(table.is_empty());
    }

    #[test]
    fn format_last_edited_chinese() {
        assert_eq!(
            format_last_edited(&LocaleBundle::stock_zh(), "3天前"),
            "最后编辑于 3天前"
        );
    }

    #[test]
    fn format_committed_on_keeps_leading_space() {
        assert_eq!(
            format_committed_on(&LocaleBundle::stock_zh(), "2024-01-05"),
            " 于 2024-01-05"
        );
        assert_eq!(
            format_committed_on(&LocaleBundle::stock_en(), "2024-01-05"),
            " от 2024-01-05"
        );
    }

    #[test]
    fn substitution_does_not_rescan_inserted_text() {
        let bundle = LocaleBundle::stock_en();
        assert_eq!(
            format_last_edited(&bundle, "{{daysAgo}}"),
            "Последнее редактирование: {{daysAgo}}"
        );
    }

    #[test]
    fn template_without_placeholder_is_returned_as_is() {
        let bundle = LocaleBundle {
            last_edited_template: "Recently edited".into(),
            ..LocaleBundle::stock_en()
        };
        assert_eq!(format_last_edited(&bundle, "now"), "Recently edited");
    }

    #[test]
    fn table_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LocaleTable>();
        assert_send_sync::<LocaleResolver>();
    }
}
