//! Locale configuration module.
//!
//! Handles loading, validating, and merging `locales.toml`. The stock bundles
//! (`en`, worded in Russian, and Simplified Chinese `zh`) are the base layer; a user file is merged
//! on top of them, so it only needs the values it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! default_locale = "en"      # Tag used when nothing else matches
//!
//! [bundles.en]
//! no_logs_label = "Нет изменений"
//! no_contributors_label = "Нет авторов"
//! last_edited_template = "Последнее редактирование: {{daysAgo}}"
//! relative_time_locale_tag = "ru"
//! view_full_history_label = "Просмотреть полную историю"
//! committed_on_template = " от {{date}}"
//!
//! [bundles.zh]
//! no_logs_label = "暂无最近变更历史"
//! # ...
//!
//! [aliases]
//! "en-US" = "en"             # Alias tag = bundle it shares
//! "zh-CN" = "zh"
//! "zh-Hans" = "zh"
//! ```
//!
//! ## Partial Configuration
//!
//! ```toml
//! # Only reword the empty-history label of the `en` bundle
//! [bundles.en]
//! no_logs_label = "Изменений пока нет"
//! ```
//!
//! New bundles must spell out every field. Unknown keys are rejected to catch
//! typos early.

use crate::locale::{
    DATE_PLACEHOLDER, DAYS_AGO_PLACEHOLDER, LocaleBundle, LocaleError, LocaleResolver, LocaleTable,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// File name looked up when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "locales.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Locale table error: {0}")]
    Locale(#[from] LocaleError),
}

/// Locale configuration loaded from `locales.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalesConfig {
    /// Tag whose bundle is used when neither the requested tag nor its
    /// primary subtag is known. May name a bundle or an alias.
    pub default_locale: String,
    /// One bundle per key; each becomes a single shared instance.
    pub bundles: BTreeMap<String, LocaleBundle>,
    /// Extra tags pointing at an existing bundle key.
    pub aliases: BTreeMap<String, String>,
}

impl Default for LocalesConfig {
    fn default() -> Self {
        let mut bundles = BTreeMap::new();
        bundles.insert("en".to_string(), LocaleBundle::stock_en());
        bundles.insert("zh".to_string(), LocaleBundle::stock_zh());
        let aliases = [("en-US", "en"), ("zh-CN", "zh"), ("zh-Hans", "zh")]
            .into_iter()
            .map(|(alias, target)| (alias.to_string(), target.to_string()))
            .collect();
        Self {
            default_locale: "en".to_string(),
            bundles,
            aliases,
        }
    }
}

impl LocalesConfig {
    /// Validate tags, alias targets, and template placeholders.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bundles.is_empty() {
            return Err(ConfigError::Validation(
                "at least one bundle must be declared".into(),
            ));
        }
        for (tag, bundle) in &self.bundles {
            if tag.is_empty() {
                return Err(ConfigError::Validation(
                    "bundle tags must not be empty".into(),
                ));
            }
            if !bundle.last_edited_template.contains(DAYS_AGO_PLACEHOLDER) {
                return Err(ConfigError::Validation(format!(
                    "bundles.{tag}.last_edited_template must contain {DAYS_AGO_PLACEHOLDER}"
                )));
            }
            if !bundle.committed_on_template.contains(DATE_PLACEHOLDER) {
                return Err(ConfigError::Validation(format!(
                    "bundles.{tag}.committed_on_template must contain {DATE_PLACEHOLDER}"
                )));
            }
        }
        for (alias, target) in &self.aliases {
            if alias.is_empty() {
                return Err(ConfigError::Validation(
                    "alias tags must not be empty".into(),
                ));
            }
            if self.bundles.contains_key(alias) {
                return Err(ConfigError::Validation(format!(
                    "alias '{alias}' shadows a bundle of the same name"
                )));
            }
            if !self.bundles.contains_key(target) {
                return Err(LocaleError::UnknownAliasTarget {
                    alias: alias.clone(),
                    target: target.clone(),
                }
                .into());
            }
        }
        if !self.bundles.contains_key(&self.default_locale)
            && !self.aliases.contains_key(&self.default_locale)
        {
            return Err(LocaleError::MissingDefault(self.default_locale.clone()).into());
        }
        Ok(())
    }

    /// Build the runtime table: one `Arc` per bundle, aliases share it.
    pub fn build_table(&self) -> Result<LocaleTable, ConfigError> {
        let mut table = LocaleTable::new();
        for (tag, bundle) in &self.bundles {
            table.insert(tag.clone(), Arc::new(bundle.clone()));
        }
        for (alias, target) in &self.aliases {
            table.insert_alias(alias.clone(), target)?;
        }
        Ok(table)
    }

    pub fn build_resolver(&self) -> Result<LocaleResolver, ConfigError> {
        let table = self.build_table()?;
        Ok(LocaleResolver::new(table, self.default_locale.clone())?)
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(LocalesConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a locales file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<LocalesConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: LocalesConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a `locales.toml` path, layered over the stock bundles.
pub fn load_config(path: &Path) -> Result<LocalesConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `locales.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Changelog Locales Configuration
# ===============================
# All settings are optional. Values shown below are the defaults; a file
# only needs the keys it wants to change, everything else is inherited.
# Unknown keys will cause an error.

# Tag used when neither the requested tag ("zh-Hant") nor its language
# subtag ("zh") has a bundle.
default_locale = "en"

# ---------------------------------------------------------------------------
# Bundles
# ---------------------------------------------------------------------------
# One table per bundle. {{daysAgo}} receives a relative time ("3 days ago"),
# {{date}} an absolute date ("2024-01-05"). relative_time_locale_tag selects
# the wording of those values ("ru", "zhCN", "enUS"). A new bundle must set
# every key.
[bundles.en]
no_logs_label = "Нет изменений"
no_contributors_label = "Нет авторов"
last_edited_template = "Последнее редактирование: {{daysAgo}}"
relative_time_locale_tag = "ru"
view_full_history_label = "Просмотреть полную историю"
committed_on_template = " от {{date}}"

[bundles.zh]
no_logs_label = "暂无最近变更历史"
no_contributors_label = "暂无相关贡献者"
last_edited_template = "最后编辑于 {{daysAgo}}"
relative_time_locale_tag = "zhCN"
view_full_history_label = "查看完整历史"
committed_on_template = " 于 {{date}}"

# ---------------------------------------------------------------------------
# Aliases
# ---------------------------------------------------------------------------
# Extra tags sharing an existing bundle. The bundle key itself ("zh") is
# always a valid tag; region tags without an entry fall back to it anyway.
[aliases]
"en-US" = "en"
"zh-CN" = "zh"
"zh-Hans" = "zh"
"##
}
