mod app;
mod config;
mod domain;
mod infra;
mod ui;
mod usecase;

#[cfg(test)]
mod tests;

use config::{default_webview_data_dir, DEFAULT_LOG_FILTER};

fn main() {
    init_logging();

    let webview_data_dir =
        default_webview_data_dir().expect("should resolve and create WebView2 data directory");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("Gestão de Chamados"))
                .with_data_directory(webview_data_dir),
        )
        .launch(app::App);
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false))
        .init();
}
