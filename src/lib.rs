//! # Changelog Locales
//!
//! Locale resolution for a documentation site's git changelog widget. A page
//! asks for a language (`"zh-Hant"`, `"en-US"`, or something garbled) and gets
//! back a bundle of display strings: empty-history labels, a "last edited"
//! template, a "committed on" template, and the key its relative-time text
//! should be worded in.
//!
//! # Resolution Ladder
//!
//! ```text
//! 1. Exact           "zh-Hant" in table?
//! 2. Primary subtag  "zh" in table?
//! 3. Default         table[default_tag]
//! ```
//!
//! An unsupported tag never blocks rendering; it just lands on the default.
//! The only error is a default tag missing from the table, which is caught
//! once when the [`locale::LocaleResolver`] is built.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`locale`] | Bundles, tables with aliasing, the fallback ladder, template substitution |
//! | [`config`] | `locales.toml` loading, merging over stock bundles, validation |
//! | [`changelog`] | Injected commit history and the localized per-page changelog view |
//! | [`time`] | Relative/absolute time text behind the `TimeFormatter` seam |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Aliases Share One Instance
//!
//! `"zh-CN"`, `"zh-Hans"` and `"zh"` map to the same `Arc<LocaleBundle>`.
//! There is no inheritance between bundles: a tag either has a full bundle or
//! points at one. Resolution is reference-stable, so callers can compare
//! bundles with `Arc::ptr_eq`.
//!
//! ## Built Once, Read Everywhere
//!
//! Tables are assembled at startup from `locales.toml` (or the stock bundles)
//! and never mutated. They are `Send + Sync` and need no locking.
//!
//! ## History Is Injected
//!
//! Commit data arrives as a [`changelog::CommitHistory`] value handed to the
//! summarizer, never through a global. The clock and the time formatter are
//! parameters too, so every output is reproducible in tests.

pub mod changelog;
pub mod config;
pub mod locale;
pub mod output;
pub mod time;

#[cfg(test)]
pub(crate) mod test_helpers;
