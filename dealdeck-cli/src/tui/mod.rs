//! Interactive deal browser
pub mod app;
pub mod events;
pub mod modal;
pub mod screens;
pub mod state;
pub mod theme;

use anyhow::Result;

use crate::deals_cli::Settings;

/// Entry point for the browser
pub async fn run(settings: &Settings) -> Result<()> {
    let app = app::App::new(settings)?;
    app.run().await
}
