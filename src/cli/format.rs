use std::{
    io::{self, Read, Write},
    process,
};

use envpad::{Config, CopyOutcome, Editor};
use tracing::instrument;

use super::{StreamClipboard, terminal::Colorize};

#[derive(Debug, clap::Parser)]
#[command(about = "Parse KEY=VALUE text from stdin and print the valid lines")]
pub struct Command {
    /// Output format (text, json)
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Command {
    #[instrument(level = "debug", skip(config))]
    pub fn run(self, config: Config) -> anyhow::Result<()> {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw)?;

        let exportable = format(
            &raw,
            config,
            self.output,
            io::stdout().lock(),
            io::stderr().lock(),
        )?;

        // Exit non-zero when nothing usable came out, so scripts can tell.
        if !exportable {
            process::exit(1);
        }

        Ok(())
    }
}

/// Parses `raw`, writes warnings to `err` and the result to `out`.
///
/// Returns whether any valid `KEY=VALUE` line was produced.
fn format(
    raw: &str,
    config: Config,
    output: OutputFormat,
    mut out: impl Write,
    mut err: impl Write,
) -> anyhow::Result<bool> {
    let mut editor = Editor::new(config);
    editor.set_raw_text(raw.to_string());

    if let Some(warnings) = editor.state().error() {
        for line in warnings.lines() {
            writeln!(err, "{}", line.warning())?;
        }
    }

    match output {
        OutputFormat::Json => {
            let snapshot = editor.state().snapshot();
            serde_json::to_writer_pretty(&mut out, &snapshot)?;
            writeln!(out)?;
            Ok(!snapshot.output.is_empty())
        }
        OutputFormat::Text => match editor.copy(StreamClipboard::new(&mut out)) {
            CopyOutcome::Failed(error) => Err(error.into()),
            outcome => {
                if !outcome.is_copied() {
                    writeln!(err, "{}", outcome.to_string().warning())?;
                }
                Ok(outcome.is_copied())
            }
        },
    }
}
