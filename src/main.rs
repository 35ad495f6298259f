//! This crate contains the source code for the binary of the gridseek visualizer.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use gridseek::{config::Cli, logging, App};

#[tokio::main]
async fn main() -> Result<()> {
    install()?;

    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;
    let mut app = App::from_config(&cli)?;

    let mut terminal = ratatui::init();
    let outcome = app.run(&mut terminal).await;
    ratatui::restore();

    outcome
}
