//! docsetgen CLI: offline documentation bundles from markdown corpora.
//!
//! Renders a markdown documentation tree into a Dash-compatible docset with a
//! searchable index, and packages docsets into versioned release archives.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
