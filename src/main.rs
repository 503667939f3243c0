mod app;
use form_editor_app::*;

use app::FormEditorApp;

fn init_logging(config: &AppConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .init();
}

fn main() -> eframe::Result<()> {
    let config = AppConfig::default();
    init_logging(&config);

    tracing::info!("starting {}", config.window_title);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(config.inner_size),
        ..Default::default()
    };
    eframe::run_native(
        &config.window_title,
        options,
        Box::new(|_cc| Ok(Box::new(FormEditorApp::new()))),
    )
}
