//! Khodam Scan Frontend Entry Point

mod models;
mod config;
mod browser;
mod repository;
mod export;
mod scanner;
mod route;
mod context;
mod store;
mod components;
mod app;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) = AppConfig::load();
    rolling_logger::init(config.verbosity);
    if let Some(err) = config_error {
        tracing::warn!("invalid inline config, using defaults: {}", err);
    }
    tracing::info!(prefix = %config.storage.prefix, "starting");

    mount_to_body(move || view! { <App config=config /> });
}
