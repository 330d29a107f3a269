use std::fmt;

/// A failed clipboard write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct ClipboardError {
    reason: String,
}

impl ClipboardError {
    /// Creates an error with a human-readable reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Destination for copied output.
pub trait Clipboard {
    /// Writes `text` to the clipboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the text could not be delivered.
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

impl<T: Clipboard + ?Sized> Clipboard for &mut T {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).write_text(text)
    }
}

/// An in-process clipboard that keeps the last text written to it.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
    failure: Option<ClipboardError>,
}

impl MemoryClipboard {
    /// Creates an empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clipboard that rejects every write with `reason`.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            contents: None,
            failure: Some(ClipboardError::new(reason)),
        }
    }

    /// The last successfully written text.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// Result of a copy request.
///
/// The [`Display`](fmt::Display) output is the notice shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    /// No row had a valid, non-blank key, so nothing was written.
    Nothing,
    /// The output was written.
    Copied {
        /// Number of `KEY=VALUE` lines written.
        lines: usize,
    },
    /// The clipboard rejected the write.
    Failed(ClipboardError),
}

impl CopyOutcome {
    /// Whether text reached the clipboard.
    #[must_use]
    pub const fn is_copied(&self) -> bool {
        matches!(self, Self::Copied { .. })
    }
}

impl fmt::Display for CopyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Nothing => write!(f, "Nothing valid to copy."),
            Self::Copied { lines } => write!(f, "Copied {lines} variable(s) to clipboard."),
            Self::Failed(error) => write!(f, "Failed to copy to clipboard: {error}"),
        }
    }
}
