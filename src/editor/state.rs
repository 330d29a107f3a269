use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::domain::{EnvironmentVariable, KeyError, RowId, row::blank_rows};

/// Everything the editor shows.
///
/// `raw_text` and `variables` are independent: parsing replaces the rows, but
/// editing rows never writes back into the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub(crate) raw_text: String,
    pub(crate) variables: Vec<EnvironmentVariable>,
    pub(crate) row_errors: HashMap<RowId, KeyError>,
    pub(crate) error: Option<String>,
    pub(crate) status: Option<String>,
}

impl EditorState {
    /// A state with `rows` blank rows and nothing else.
    #[must_use]
    pub fn new(rows: usize) -> Self {
        Self {
            raw_text: String::new(),
            variables: blank_rows(rows),
            row_errors: HashMap::new(),
            error: None,
            status: None,
        }
    }

    /// The pasted text.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Rows in display order.
    #[must_use]
    pub fn variables(&self) -> &[EnvironmentVariable] {
        &self.variables
    }

    /// Looks up a row by id.
    #[must_use]
    pub fn variable(&self, id: RowId) -> Option<&EnvironmentVariable> {
        self.variables.iter().find(|row| row.id == id)
    }

    /// The validation error recorded for a row, if any.
    ///
    /// Errors for deleted rows may linger here; they are never consulted for
    /// rows that no longer exist.
    #[must_use]
    pub fn row_error(&self, id: RowId) -> Option<&KeyError> {
        self.row_errors.get(&id)
    }

    /// All recorded row errors.
    #[must_use]
    pub const fn row_errors(&self) -> &HashMap<RowId, KeyError> {
        &self.row_errors
    }

    /// Parse warnings from the last parse, newline-joined.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Transient success message.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Rows that make it into the output: non-blank key and no row error.
    pub fn exportable(&self) -> impl Iterator<Item = &EnvironmentVariable> {
        self.variables
            .iter()
            .filter(|row| !row.has_blank_key() && !self.row_errors.contains_key(&row.id))
    }

    /// The exportable rows as newline-joined `KEY=VALUE` lines.
    #[must_use]
    pub fn output_text(&self) -> String {
        self.exportable()
            .map(EnvironmentVariable::to_line)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// A serializable view of the state.
    #[must_use]
    pub fn snapshot(&self) -> EditorSnapshot<'_> {
        let row_errors = self
            .variables
            .iter()
            .filter_map(|row| {
                self.row_errors
                    .get(&row.id)
                    .map(|error| (row.id.to_string(), error.to_string()))
            })
            .collect();

        EditorSnapshot {
            raw_text: &self.raw_text,
            variables: &self.variables,
            row_errors,
            error: self.error.as_deref(),
            status: self.status.as_deref(),
            output: self.output_text(),
        }
    }
}

/// A borrowed, serializable view of an [`EditorState`].
///
/// Row errors for rows that have been deleted are left out.
#[derive(Debug, Clone, Serialize)]
pub struct EditorSnapshot<'a> {
    /// The pasted text.
    pub raw_text: &'a str,
    /// Rows in display order.
    pub variables: &'a [EnvironmentVariable],
    /// Row error messages keyed by row id.
    pub row_errors: BTreeMap<String, String>,
    /// Parse warnings banner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'a str>,
    /// Success banner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'a str>,
    /// The text a copy would produce.
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_blank() {
        let state = EditorState::new(20);
        assert_eq!(state.variables().len(), 20);
        assert!(state.variables().iter().all(|row| row.key.is_empty() && row.value.is_empty()));
        assert_eq!(state.raw_text(), "");
        assert!(state.row_errors().is_empty());
        assert_eq!(state.error(), None);
        assert_eq!(state.status(), None);
        assert_eq!(state.output_text(), "");
    }

    #[test]
    fn output_skips_blank_and_invalid_rows() {
        let mut state = EditorState::new(0);
        let bad = EnvironmentVariable::new("BAD-KEY", "x");
        state.row_errors.insert(bad.id, KeyError::InvalidCharacters);
        state.variables = vec![
            EnvironmentVariable::new("A", "1"),
            EnvironmentVariable::new("   ", "orphan value"),
            bad,
            EnvironmentVariable::new("B", ""),
        ];

        assert_eq!(state.output_text(), "A=1\nB=");
    }

    #[test]
    fn snapshot_omits_stale_errors() {
        let mut state = EditorState::new(1);
        let live = state.variables[0].id;
        state.row_errors.insert(live, KeyError::Required);
        state.row_errors.insert(RowId::new(), KeyError::Required);

        let snapshot = state.snapshot();
        assert_eq!(snapshot.row_errors.len(), 1);
        assert_eq!(snapshot.row_errors[&live.to_string()], "Key is required.");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("status").is_none());
        assert_eq!(json["variables"].as_array().unwrap().len(), 1);
    }
}
