//! Environment variable list editor
//!
//! Paste `KEY=VALUE` text, get it parsed into rows, edit and validate the
//! rows, and copy the valid ones back out as text.

pub mod domain;
pub use domain::{Config, EnvironmentVariable, KeyError, RowId, validate_key};

pub mod parser;
pub use parser::{ParseReport, ParseWarning, ParsedEntry, parse};

pub mod editor;
pub use editor::{
    Clipboard, ClipboardError, Clock, CopyOutcome, Editor, EditorError, EditorSnapshot,
    EditorState, ManualClock, MemoryClipboard, SystemClock,
};
