use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use clap::Parser;
use client_core::{
    config::{load_settings_from, DEFAULT_CONFIG_FILE},
    ClientSettings,
};
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use ui::InvoiceFormApp;

const APP_TITLE: &str = "BUP Invoice";

#[derive(Parser, Debug)]
struct StartupArgs {
    #[arg(long)]
    api_base_url: Option<String>,
    /// Directory documents are saved into.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

impl StartupArgs {
    fn apply(&self, mut settings: ClientSettings) -> ClientSettings {
        if let Some(url) = &self.api_base_url {
            settings.api_base_url = url.clone();
        }
        if let Some(dir) = &self.output_dir {
            settings.download_dir = dir.clone();
        }
        settings
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = StartupArgs::parse();
    let settings = args.apply(load_settings_from(&args.config));
    let download_dir = settings.download_dir.clone();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([520.0, 600.0])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(InvoiceFormApp::new(cmd_tx, ui_rx, download_dir)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_flags_override_settings() {
        let args = StartupArgs::try_parse_from([
            "desktop_gui",
            "--api-base-url",
            "http://127.0.0.1:5173/api",
            "--output-dir",
            "/tmp/invoices",
        ])
        .expect("parse");

        let settings = args.apply(ClientSettings::default());

        assert_eq!(settings.api_base_url, "http://127.0.0.1:5173/api");
        assert_eq!(settings.download_dir, PathBuf::from("/tmp/invoices"));
    }

    #[test]
    fn settings_untouched_without_flags() {
        let args = StartupArgs::try_parse_from(["desktop_gui"]).expect("parse");
        assert_eq!(args.apply(ClientSettings::default()), ClientSettings::default());
    }
}
