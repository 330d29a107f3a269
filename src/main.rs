//! `envpad` - edit `KEY=VALUE` environment variable lists from the terminal.

use clap::Parser;

mod cli;

fn main() -> anyhow::Result<()> {
    cli::Cli::parse().run()
}
