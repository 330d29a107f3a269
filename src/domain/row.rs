use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Stable handle for a row in the editor.
///
/// Ids are assigned when a row is created and are never reused. Positions
/// shift as rows are added and deleted, and keys are user-editable (and may
/// be empty or collide), so the id is the only safe way to address a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RowId(Uuid);

impl RowId {
    /// Generates a fresh, random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single editable `KEY=VALUE` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentVariable {
    /// Identifier assigned at creation.
    pub id: RowId,
    /// The variable name, exactly as typed.
    pub key: String,
    /// The variable value, exactly as typed.
    pub value: String,
}

impl EnvironmentVariable {
    /// Creates a row with a fresh id.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: RowId::new(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a blank row with a fresh id.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(String::new(), String::new())
    }

    /// Whether the key is blank once surrounding whitespace is ignored.
    #[must_use]
    pub fn has_blank_key(&self) -> bool {
        self.key.trim().is_empty()
    }

    /// Renders the row as a `KEY=VALUE` line.
    #[must_use]
    pub fn to_line(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

/// Builds `count` blank rows.
pub(crate) fn blank_rows(count: usize) -> Vec<EnvironmentVariable> {
    std::iter::repeat_with(EnvironmentVariable::empty)
        .take(count)
        .collect()
}
