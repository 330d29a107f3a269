//! The editor state store.
//!
//! [`Editor`] owns the pasted text, the rows derived from it, per-row key
//! errors and the two banners. Every user action is a named method that
//! mutates the state synchronously; nothing re-derives implicitly.

use std::time::Instant;

use tracing::{debug, instrument};

use crate::{
    domain::{Config, EnvironmentVariable, RowId, validate_key},
    parser::{ParseReport, parse},
};

mod clipboard;
mod state;
mod status;

pub use clipboard::{Clipboard, ClipboardError, CopyOutcome, MemoryClipboard};
pub use state::{EditorSnapshot, EditorState};
pub use status::{Clock, ManualClock, SystemClock};
use status::StatusTimer;

/// Errors returned by row operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    /// No row has the given id.
    #[error("row {0} not found")]
    UnknownRow(RowId),
}

/// A mounted editor instance.
///
/// Created once with blank rows; torn down with [`Editor::unmount`].
#[derive(Debug)]
pub struct Editor<C = SystemClock> {
    config: Config,
    state: EditorState,
    clock: C,
    status_timer: StatusTimer,
}

impl Editor {
    /// Creates an editor driven by the system clock.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl<C: Clock> Editor<C> {
    /// Creates an editor with a custom clock.
    #[must_use]
    pub fn with_clock(config: Config, clock: C) -> Self {
        let state = EditorState::new(config.initial_row_count());
        Self {
            config,
            state,
            clock,
            status_timer: StatusTimer::default(),
        }
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the pasted text.
    ///
    /// If the new text is non-empty and differs from the old text, it is
    /// parsed immediately and the rows are replaced (see
    /// [`Editor::parse_and_populate`]). Returns the parse report when a parse
    /// happened.
    #[instrument(level = "debug", skip_all, fields(bytes = text.len()))]
    pub fn set_raw_text(&mut self, text: String) -> Option<ParseReport> {
        if text == self.state.raw_text {
            return None;
        }
        self.state.raw_text = text;
        if self.state.raw_text.is_empty() {
            return None;
        }
        Some(self.parse_and_populate())
    }

    /// Parses the current text and replaces every row with the result.
    ///
    /// Rows are padded with blanks up to the configured minimum. Unsaved row
    /// edits are discarded, and row errors are dropped along with the rows
    /// they belonged to. Warnings become the error banner; a clean parse sets
    /// the status banner instead.
    #[instrument(level = "debug", skip(self))]
    pub fn parse_and_populate(&mut self) -> ParseReport {
        let report = parse(&self.state.raw_text, &self.config);

        self.state.variables = report.to_rows(self.config.initial_row_count());
        self.state.row_errors.clear();

        if let Some(warnings) = report.warning_text() {
            self.state.error = Some(warnings);
            self.set_status(None);
        } else {
            self.state.error = None;
            self.set_status(Some(format!(
                "Parsed {} variable(s).",
                report.entries().len()
            )));
        }

        report
    }

    /// Updates a row's key and re-validates it.
    ///
    /// The key is stored even when invalid; validation only annotates.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownRow`] if no row has the given id.
    #[instrument(level = "debug", skip(self))]
    pub fn change_key(&mut self, id: RowId, key: String) -> Result<(), EditorError> {
        let row = self.row_mut(id)?;
        row.key = key;

        match validate_key(&row.key) {
            Ok(()) => {
                self.state.row_errors.remove(&id);
            }
            Err(error) => {
                debug!(%id, %error, "invalid key");
                self.state.row_errors.insert(id, error);
            }
        }
        Ok(())
    }

    /// Updates a row's value. Row errors are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownRow`] if no row has the given id.
    #[instrument(level = "debug", skip(self, value))]
    pub fn change_value(&mut self, id: RowId, value: String) -> Result<(), EditorError> {
        self.row_mut(id)?.value = value;
        Ok(())
    }

    /// Appends a blank row and returns its id.
    pub fn add_row(&mut self) -> RowId {
        let row = EnvironmentVariable::empty();
        let id = row.id;
        self.state.variables.push(row);
        debug!(%id, rows = self.state.variables.len(), "added row");
        id
    }

    /// Removes a row.
    ///
    /// Any error recorded for the row is left in place.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::UnknownRow`] if no row has the given id.
    pub fn delete_row(&mut self, id: RowId) -> Result<EnvironmentVariable, EditorError> {
        let position = self
            .state
            .variables
            .iter()
            .position(|row| row.id == id)
            .ok_or(EditorError::UnknownRow(id))?;
        let row = self.state.variables.remove(position);
        debug!(%id, rows = self.state.variables.len(), "deleted row");
        Ok(row)
    }

    /// Empties the pasted text. Rows and banners are kept.
    pub fn clear_text(&mut self) {
        self.state.raw_text.clear();
    }

    /// Resets text, rows, row errors and both banners.
    #[instrument(level = "debug", skip(self))]
    pub fn clear_all(&mut self) {
        self.state = EditorState::new(self.config.initial_row_count());
        self.status_timer.cancel();
    }

    /// The `KEY=VALUE` lines a copy would produce.
    #[must_use]
    pub fn output_text(&self) -> String {
        self.state.output_text()
    }

    /// Writes the output text to `clipboard`.
    ///
    /// Nothing is written when no row qualifies. The outcome only informs the
    /// user; the state is not changed either way.
    #[must_use]
    #[instrument(level = "debug", skip_all)]
    pub fn copy(&self, mut clipboard: impl Clipboard) -> CopyOutcome {
        let lines = self.state.exportable().count();
        if lines == 0 {
            return CopyOutcome::Nothing;
        }

        match clipboard.write_text(&self.output_text()) {
            Ok(()) => {
                debug!(lines, "copied output");
                CopyOutcome::Copied { lines }
            }
            Err(error) => {
                tracing::warn!(%error, "clipboard write failed");
                CopyOutcome::Failed(error)
            }
        }
    }

    /// Clears the status banner if its display time has run out.
    ///
    /// Returns `true` if the banner was cleared by this call.
    pub fn poll(&mut self) -> bool {
        if self.status_timer.fire(self.clock.now()) {
            debug!("status expired");
            self.state.status = None;
            true
        } else {
            false
        }
    }

    /// When the status banner is due to clear, if it is showing.
    #[must_use]
    pub const fn status_deadline(&self) -> Option<Instant> {
        self.status_timer.deadline()
    }

    /// Tears the editor down, cancelling any pending status clear, and
    /// returns the final state.
    #[must_use]
    pub fn unmount(mut self) -> EditorState {
        self.status_timer.cancel();
        self.state
    }

    /// Only a real change to the banner touches the auto-clear timer.
    fn set_status(&mut self, status: Option<String>) {
        if status == self.state.status {
            return;
        }
        match &status {
            Some(_) => self
                .status_timer
                .schedule(self.clock.now(), self.config.status_timeout()),
            None => self.status_timer.cancel(),
        }
        self.state.status = status;
    }

    fn row_mut(&mut self, id: RowId) -> Result<&mut EnvironmentVariable, EditorError> {
        self.state
            .variables
            .iter_mut()
            .find(|row| row.id == id)
            .ok_or(EditorError::UnknownRow(id))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::KeyError;

    fn editor() -> (Editor<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (Editor::with_clock(Config::default(), clock.clone()), clock)
    }

    fn first_id(editor: &Editor<ManualClock>) -> RowId {
        editor.state().variables()[0].id
    }

    #[test]
    fn starts_with_blank_rows() {
        let (editor, _) = editor();
        assert_eq!(editor.state().variables().len(), 20);
        assert_eq!(editor.status_deadline(), None);
    }

    #[test]
    fn unchanged_text_is_not_reparsed() {
        let (mut editor, _) = editor();
        assert!(editor.set_raw_text("A=1".to_string()).is_some());

        let id = first_id(&editor);
        editor.change_value(id, "edited".to_string()).unwrap();

        assert!(editor.set_raw_text("A=1".to_string()).is_none());
        assert_eq!(editor.state().variables()[0].value, "edited");
    }

    #[test]
    fn empty_text_is_not_parsed() {
        let (mut editor, _) = editor();
        editor.set_raw_text("A=1".to_string());
        let rows = editor.state().variables().to_vec();

        assert!(editor.set_raw_text(String::new()).is_none());
        assert_eq!(editor.state().variables(), rows.as_slice());
        assert_eq!(editor.state().raw_text(), "");
    }

    #[test]
    fn parse_replaces_rows_and_drops_row_errors() {
        let (mut editor, _) = editor();
        let id = first_id(&editor);
        editor.change_key(id, "bad key".to_string()).unwrap();

        editor.set_raw_text("A=1".to_string());

        assert!(editor.state().variable(id).is_none());
        assert!(editor.state().row_errors().is_empty());
    }

    #[test]
    fn key_validation_annotates_without_blocking() {
        let (mut editor, _) = editor();
        let id = first_id(&editor);

        editor.change_key(id, "MY-KEY".to_string()).unwrap();
        assert_eq!(editor.state().variables()[0].key, "MY-KEY");
        assert_eq!(
            editor.state().row_error(id),
            Some(&KeyError::InvalidCharacters)
        );

        editor.change_key(id, "  ".to_string()).unwrap();
        assert_eq!(editor.state().row_error(id), Some(&KeyError::Required));

        editor.change_key(id, "MY_KEY".to_string()).unwrap();
        assert_eq!(editor.state().row_error(id), None);
    }

    #[test]
    fn value_edit_keeps_row_error() {
        let (mut editor, _) = editor();
        let id = first_id(&editor);
        editor.change_key(id, String::new()).unwrap();
        editor.change_value(id, "v".to_string()).unwrap();

        assert_eq!(editor.state().row_error(id), Some(&KeyError::Required));
        assert_eq!(editor.state().variables()[0].value, "v");
    }

    #[test]
    fn unknown_row_is_an_error() {
        let (mut editor, _) = editor();
        let missing = RowId::new();

        assert_eq!(
            editor.change_key(missing, "A".to_string()),
            Err(EditorError::UnknownRow(missing))
        );
        assert_eq!(
            editor.change_value(missing, "A".to_string()),
            Err(EditorError::UnknownRow(missing))
        );
        assert_eq!(
            editor.delete_row(missing),
            Err(EditorError::UnknownRow(missing))
        );
    }

    #[test]
    fn add_and_delete_rows() {
        let (mut editor, _) = editor();
        let id = editor.add_row();
        assert_eq!(editor.state().variables().len(), 21);
        assert_eq!(editor.state().variables()[20].id, id);

        let removed = editor.delete_row(id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(editor.state().variables().len(), 20);
    }

    #[test]
    fn delete_leaves_stale_row_error() {
        let (mut editor, _) = editor();
        let id = first_id(&editor);
        editor.change_key(id, "?".to_string()).unwrap();
        editor.delete_row(id).unwrap();

        assert!(editor.state().row_error(id).is_some());
        assert_eq!(editor.state().snapshot().row_errors.len(), 0);
    }

    #[test]
    fn deleting_below_the_minimum_is_allowed() {
        let (mut editor, _) = editor();
        let ids: Vec<_> = editor.state().variables().iter().map(|r| r.id).collect();
        for id in ids {
            editor.delete_row(id).unwrap();
        }
        assert!(editor.state().variables().is_empty());
    }

    #[test]
    fn clear_text_only_touches_text() {
        let (mut editor, _) = editor();
        editor.set_raw_text("A=1\nbroken".to_string());
        let rows = editor.state().variables().to_vec();

        editor.clear_text();

        assert_eq!(editor.state().raw_text(), "");
        assert_eq!(editor.state().variables(), rows.as_slice());
        assert!(editor.state().error().is_some());
    }

    #[test]
    fn status_clears_after_timeout() {
        let (mut editor, clock) = editor();
        editor.set_raw_text("A=1".to_string());
        assert_eq!(editor.state().status(), Some("Parsed 1 variable(s)."));

        clock.advance(Duration::from_millis(9_999));
        assert!(!editor.poll());
        assert!(editor.state().status().is_some());

        clock.advance(Duration::from_millis(1));
        assert!(editor.poll());
        assert_eq!(editor.state().status(), None);
        assert_eq!(editor.status_deadline(), None);
    }

    #[test]
    fn new_status_reschedules_clear() {
        let (mut editor, clock) = editor();
        editor.set_raw_text("A=1".to_string());
        clock.advance(Duration::from_secs(6));
        editor.set_raw_text("A=1\nB=2".to_string());
        clock.advance(Duration::from_secs(6));

        assert!(!editor.poll());
        assert_eq!(editor.state().status(), Some("Parsed 2 variable(s)."));
    }

    #[test]
    fn identical_status_keeps_original_deadline() {
        let (mut editor, clock) = editor();
        editor.set_raw_text("A=1".to_string());
        clock.advance(Duration::from_secs(6));
        editor.set_raw_text("A=2".to_string());
        assert_eq!(editor.state().variables()[0].value, "2");

        clock.advance(Duration::from_secs(4));
        assert!(editor.poll());
        assert_eq!(editor.state().status(), None);
    }

    #[test]
    fn warnings_cancel_pending_status() {
        let (mut editor, clock) = editor();
        editor.set_raw_text("A=1".to_string());
        editor.set_raw_text("nope".to_string());

        assert_eq!(editor.state().status(), None);
        assert_eq!(editor.status_deadline(), None);
        clock.advance(Duration::from_secs(60));
        assert!(!editor.poll());
    }

    #[test]
    fn copy_with_failing_clipboard_reports_failure() {
        let (mut editor, _) = editor();
        editor.set_raw_text("A=1".to_string());
        let outcome = editor.copy(MemoryClipboard::failing("no access"));

        assert_eq!(
            outcome,
            CopyOutcome::Failed(ClipboardError::new("no access"))
        );
    }

    #[test]
    fn unmount_cancels_timer() {
        let (mut editor, _) = editor();
        editor.set_raw_text("A=1".to_string());
        assert!(editor.status_deadline().is_some());

        let state = editor.unmount();
        assert_eq!(state.status(), Some("Parsed 1 variable(s)."));
    }
}
