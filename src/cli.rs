use std::{
    io::{self, Write},
    time::Duration,
};

mod format;
mod render;
mod session;
mod terminal;

use clap::ArgAction;
use envpad::{Clipboard, ClipboardError, Config};

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Minimum number of rows after a reset or parse
    #[arg(long, value_name = "COUNT", default_value_t = 20, global = true)]
    rows: usize,

    /// How long status messages stay visible, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 10_000, global = true)]
    status_timeout_ms: u64,

    /// Warn when a key is defined on more than one line
    #[arg(long, global = true)]
    warn_duplicates: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = self.config();
        self.command
            .unwrap_or_else(|| Command::Edit(session::Command::default()))
            .run(config)
    }

    fn config(&self) -> Config {
        let mut config = Config::default();
        config.set_initial_row_count(self.rows);
        config.set_status_timeout(Duration::from_millis(self.status_timeout_ms));
        config.warn_on_duplicate_keys = self.warn_duplicates;
        config
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        // stdout carries the edited output, so logs go to stderr
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Edit variables interactively (default)
    Edit(session::Command),

    /// Parse text from stdin and print the valid `KEY=VALUE` lines
    Format(format::Command),
}

impl Command {
    fn run(self, config: Config) -> anyhow::Result<()> {
        match self {
            Self::Edit(command) => command.run(config)?,
            Self::Format(command) => command.run(config)?,
        }
        Ok(())
    }
}

/// Clipboard that writes copied text to an output stream.
///
/// The terminal has no portable clipboard, so the copied lines are printed
/// where the user (or a pipe) can pick them up.
pub struct StreamClipboard<W> {
    out: W,
}

impl<W: Write> StreamClipboard<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Clipboard for StreamClipboard<W> {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        writeln!(self.out, "{text}")
            .and_then(|()| self.out.flush())
            .map_err(|e| ClipboardError::new(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn flags_build_config() {
        let cli = Cli::try_parse_from([
            "envpad",
            "--rows",
            "5",
            "--status-timeout-ms",
            "250",
            "--warn-duplicates",
            "format",
        ])
        .unwrap();

        let config = cli.config();
        assert_eq!(config.initial_row_count(), 5);
        assert_eq!(config.status_timeout(), Duration::from_millis(250));
        assert!(config.warn_on_duplicate_keys);
        assert!(matches!(cli.command, Some(Command::Format(_))));
    }

    #[test]
    fn defaults_match_library_config() {
        let cli = Cli::try_parse_from(["envpad"]).unwrap();
        assert_eq!(cli.config(), Config::default());
        assert!(cli.command.is_none());
    }

    #[test]
    fn stream_clipboard_writes_a_line() {
        let mut buffer = Vec::new();
        StreamClipboard::new(&mut buffer)
            .write_text("A=1\nB=2")
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "A=1\nB=2\n");
    }
}
