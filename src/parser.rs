//! Parsing of raw `KEY=VALUE` text.
//!
//! The parser is a pure function over the pasted text. It never fails: lines
//! it cannot use are skipped and reported as [`ParseWarning`]s.

use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::domain::{Config, EnvironmentVariable, row::blank_rows};

/// A non-fatal problem with one input line.
///
/// The [`Display`](std::fmt::Display) output is the banner text shown to the
/// user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseWarning {
    /// The line has no `=` delimiter.
    #[error("Warning: Line {line} does not contain '='. Input: \"{input}\". Skipping.")]
    MissingEquals {
        /// 1-based line number.
        line: usize,
        /// The trimmed line.
        input: String,
    },

    /// The text before the first `=` is blank.
    #[error("Warning: Empty key on line {line}. Input: \"{input}\". Skipping.")]
    EmptyKey {
        /// 1-based line number.
        line: usize,
        /// The trimmed line.
        input: String,
    },

    /// A key was defined again on a later line.
    ///
    /// Only reported when [`Config::warn_on_duplicate_keys`] is set.
    #[error("Warning: Duplicate key \"{key}\" on line {line} overrides line {previous}.")]
    DuplicateKey {
        /// The repeated key.
        key: String,
        /// 1-based line number of the overriding definition.
        line: usize,
        /// 1-based line number of the definition being replaced.
        previous: usize,
    },
}

/// A key/value pair recovered from the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// Trimmed text before the first `=`.
    pub key: String,
    /// Trimmed text after the first `=`; may be empty.
    pub value: String,
    /// 1-based line number of the definition that survived deduplication.
    pub line: usize,
}

/// The outcome of parsing a block of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    entries: Vec<ParsedEntry>,
    warnings: Vec<ParseWarning>,
}

impl ParseReport {
    /// Unique entries, ordered by where each key first appeared.
    ///
    /// Each entry carries the value of the key's last definition.
    #[must_use]
    pub fn entries(&self) -> &[ParsedEntry] {
        &self.entries
    }

    /// Warnings in input order.
    #[must_use]
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// The warnings joined into a single newline-separated banner, if any.
    #[must_use]
    pub fn warning_text(&self) -> Option<String> {
        if self.warnings.is_empty() {
            return None;
        }
        Some(
            self.warnings
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }

    /// Builds editor rows from the entries, padding with blank rows up to
    /// `min_rows`.
    ///
    /// Every row gets a fresh id. When there are more entries than
    /// `min_rows`, no padding is added.
    #[must_use]
    pub fn to_rows(&self, min_rows: usize) -> Vec<EnvironmentVariable> {
        let mut rows: Vec<_> = self
            .entries
            .iter()
            .map(|entry| EnvironmentVariable::new(entry.key.clone(), entry.value.clone()))
            .collect();
        let padding = min_rows.saturating_sub(rows.len());
        rows.extend(blank_rows(padding));
        rows
    }
}

/// Parses raw multi-line text into unique key/value entries.
///
/// Blank lines and lines starting with `#` (after trimming) are ignored. The
/// first `=` splits key from value and both sides are trimmed. When a key is
/// defined more than once the last value wins, but the entry keeps the
/// position where the key first appeared.
///
/// # Examples
///
/// ```
/// use envpad::{parse, Config};
///
/// let report = parse("FOO=bar\n# comment\nBAZ = qux \nFOO=baz", &Config::default());
///
/// let pairs: Vec<_> = report
///     .entries()
///     .iter()
///     .map(|e| (e.key.as_str(), e.value.as_str()))
///     .collect();
/// assert_eq!(pairs, [("FOO", "baz"), ("BAZ", "qux")]);
/// assert!(report.warnings().is_empty());
/// ```
#[must_use]
#[instrument(level = "debug", skip_all, fields(bytes = raw.len()))]
pub fn parse(raw: &str, config: &Config) -> ParseReport {
    let mut report = ParseReport::default();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (index, line) in raw.lines().enumerate() {
        let number = index + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            report.warnings.push(ParseWarning::MissingEquals {
                line: number,
                input: trimmed.to_string(),
            });
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            report.warnings.push(ParseWarning::EmptyKey {
                line: number,
                input: trimmed.to_string(),
            });
            continue;
        }

        let entry = ParsedEntry {
            key: key.to_string(),
            value: value.trim().to_string(),
            line: number,
        };

        if let Some(&position) = positions.get(key) {
            let previous = &mut report.entries[position];
            debug!(
                key,
                line = number,
                previous = previous.line,
                "duplicate key overrides earlier definition"
            );
            if config.warn_on_duplicate_keys {
                report.warnings.push(ParseWarning::DuplicateKey {
                    key: key.to_string(),
                    line: number,
                    previous: previous.line,
                });
            }
            *previous = entry;
        } else {
            positions.insert(entry.key.clone(), report.entries.len());
            report.entries.push(entry);
        }
    }

    debug!(
        entries = report.entries.len(),
        warnings = report.warnings.len(),
        "parsed input"
    );
    report
}
