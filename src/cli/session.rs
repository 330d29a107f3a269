//! Interactive editing session.
//!
//! Reads one command per line and redraws the row table after every change.
//! Rows are addressed by their 1-based position in the table.

use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use envpad::{Config, CopyOutcome, Editor, RowId};
use tracing::instrument;

use super::{StreamClipboard, render::render, terminal::Colorize};

const HELP: &str = "\
Commands:
  paste              replace the text; end input with a line containing only '.'
  text               show the pasted text
  key <n> <KEY>      set the key of row n
  value <n> <VALUE>  set the value of row n
  add                append an empty row
  delete <n>         remove row n
  clear-text         empty the pasted text (rows are kept)
  clear-all          reset everything
  copy               print the valid KEY=VALUE lines
  show               redraw the table
  help               show this message
  quit               leave the editor";

const PASTE_TERMINATOR: &str = ".";

#[derive(Debug, Default, clap::Parser)]
pub struct Command {
    /// Do not redraw the table after every change
    #[arg(long)]
    no_redraw: bool,
}

impl Command {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: Config) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut session = Session::new(
            Editor::new(config),
            stdin.lock(),
            stdout.lock(),
            !self.no_redraw,
        );
        session.run()?;
        Ok(())
    }
}

/// A single line of user input, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Paste,
    Text,
    Key { row: usize, text: String },
    Value { row: usize, text: String },
    Add,
    Delete { row: usize },
    ClearText,
    ClearAll,
    Copy,
    Show,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
enum ActionError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),

    #[error("'{0}' needs a row number.")]
    MissingRow(String),

    #[error("'{0}' is not a row number.")]
    InvalidRow(String),
}

impl FromStr for Action {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim_start();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        let action = match command {
            "paste" => Self::Paste,
            "text" => Self::Text,
            "key" | "k" => {
                let (row, text) = row_and_text(command, rest)?;
                Self::Key { row, text }
            }
            "value" | "v" => {
                let (row, text) = row_and_text(command, rest)?;
                Self::Value { row, text }
            }
            "add" => Self::Add,
            "delete" | "rm" => Self::Delete {
                row: parse_row(command, rest.trim())?,
            },
            "clear-text" => Self::ClearText,
            "clear-all" => Self::ClearAll,
            "copy" => Self::Copy,
            "show" | "" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(ActionError::Unknown(other.to_string())),
        };
        Ok(action)
    }
}

/// Splits `"<n> <text>"`. Everything after the first space following the row
/// number is kept verbatim, so keys and values can be set to blank or padded
/// text.
fn row_and_text(command: &str, rest: &str) -> Result<(usize, String), ActionError> {
    let rest = rest.trim_start();
    let (row, text) = rest.split_once(' ').unwrap_or((rest, ""));
    Ok((parse_row(command, row)?, text.to_string()))
}

fn parse_row(command: &str, row: &str) -> Result<usize, ActionError> {
    if row.is_empty() {
        return Err(ActionError::MissingRow(command.to_string()));
    }
    row.parse::<usize>()
        .ok()
        .filter(|&n| n > 0)
        .ok_or_else(|| ActionError::InvalidRow(row.to_string()))
}

struct Session<R, W> {
    editor: Editor,
    input: R,
    output: W,
    redraw: bool,
}

impl<R: BufRead, W: Write> Session<R, W> {
    const fn new(editor: Editor, input: R, output: W, redraw: bool) -> Self {
        Self {
            editor,
            input,
            output,
            redraw,
        }
    }

    fn run(&mut self) -> io::Result<()> {
        self.show()?;
        writeln!(self.output, "{}", "Type 'help' for a list of commands.".dim())?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                break;
            };
            self.editor.poll();

            match line.parse::<Action>() {
                Ok(Action::Quit) => break,
                Ok(action) => self.apply(action)?,
                Err(error) => writeln!(self.output, "{}", error.to_string().error())?,
            }
        }
        Ok(())
    }

    fn apply(&mut self, action: Action) -> io::Result<()> {
        let changed = match action {
            Action::Paste => self.paste()?,
            Action::Text => {
                let text = self.editor.state().raw_text();
                if text.is_empty() {
                    writeln!(self.output, "{}", "(no text)".dim())?;
                } else {
                    writeln!(self.output, "{text}")?;
                }
                false
            }
            Action::Key { row, text } => self
                .row_id(row)?
                .is_some_and(|id| self.editor.change_key(id, text).is_ok()),
            Action::Value { row, text } => self
                .row_id(row)?
                .is_some_and(|id| self.editor.change_value(id, text).is_ok()),
            Action::Add => {
                self.editor.add_row();
                true
            }
            Action::Delete { row } => self
                .row_id(row)?
                .is_some_and(|id| self.editor.delete_row(id).is_ok()),
            Action::ClearText => {
                self.editor.clear_text();
                writeln!(self.output, "{}", "Text cleared.".dim())?;
                false
            }
            Action::ClearAll => {
                self.editor.clear_all();
                true
            }
            Action::Copy => {
                let outcome = self.editor.copy(StreamClipboard::new(&mut self.output));
                let notice = outcome.to_string();
                let notice = match outcome {
                    CopyOutcome::Copied { .. } => notice.success(),
                    CopyOutcome::Nothing => notice.warning(),
                    CopyOutcome::Failed(_) => notice.error(),
                };
                writeln!(self.output, "{notice}")?;
                false
            }
            Action::Show => return self.show(),
            Action::Help => {
                writeln!(self.output, "{HELP}")?;
                false
            }
            Action::Quit => false,
        };

        if changed && self.redraw {
            self.show()?;
        }
        Ok(())
    }

    /// Reads pasted lines up to the terminator and hands them to the editor.
    fn paste(&mut self) -> io::Result<bool> {
        writeln!(
            self.output,
            "{}",
            format!("Paste text, then a line containing only '{PASTE_TERMINATOR}':").dim()
        )?;

        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line == PASTE_TERMINATOR {
                break;
            }
            lines.push(line);
        }

        if self.editor.set_raw_text(lines.join("\n")).is_some() {
            Ok(true)
        } else {
            writeln!(self.output, "{}", "Nothing new to parse.".dim())?;
            Ok(false)
        }
    }

    fn row_id(&mut self, row: usize) -> io::Result<Option<RowId>> {
        let rows = self.editor.state().variables();
        if let Some(variable) = rows.get(row - 1) {
            return Ok(Some(variable.id));
        }
        let message = format!("No row {row}; there are {} rows.", rows.len());
        writeln!(self.output, "{}", message.error())?;
        Ok(None)
    }

    fn show(&mut self) -> io::Result<()> {
        write!(self.output, "{}", render(self.editor.state()))
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        Ok(Some(line))
    }
}
