//! Browser client for the chemical equipment parameter visualizer.
//!
//! Users sign in, upload equipment CSV files, and browse the resulting
//! summaries, charts and PDF reports served by the backend API.

pub mod api;
pub mod app;
pub mod browser;
pub mod components;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod models;
pub mod pages;
pub mod requests;
pub mod router;
pub mod session;
pub mod shortcuts;
pub mod upload;

use tracing::info;

use crate::app::App;
use crate::config::{AppConfig, APP_VERSION};

/// Install logging and mount the app on `<body>`.
pub fn run() {
    let config = AppConfig::load();
    logging::init(&config.log_directive);
    info!("Starting equipment visualizer v{}", APP_VERSION);
    leptos::mount::mount_to_body(App);
}
