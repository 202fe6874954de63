use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use lesen_config::Config;
use lesen_ocr::HotkeyManager;
use lesen_translator::MyMemoryTranslator;
use lesen_types::AppEvent;

pub mod check;
pub mod controller;
pub mod error;
pub mod events;
pub mod host;
pub mod io;
pub mod logging;
pub mod pipeline;
pub mod state;
pub mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::pipeline::Pipeline;
use self::state::AppState;

/// Select a screen region, read its German text and translate it
#[derive(Debug, Parser)]
#[command(name = "lesen", version)]
struct Cli {
    /// JSON profile to load instead of the built-in defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Translate a test word and exit
    #[arg(long)]
    check_translator: bool,
}

fn main() -> anyhow::Result<()> {
    // A missing .env is fine
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    logging::init(cli.log_json)?;

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::new(),
    };
    tracing::debug!("Config: {:?}", config);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("lesen-worker")
        .build()
        .context("Failed to start async runtime")?;

    if cli.check_translator {
        let translator = MyMemoryTranslator::from_config(&config.translator);
        let report = runtime.block_on(check::check_translator(&translator))?;
        println!("{report}");
        return Ok(());
    }

    let guard = runtime.enter();
    let controller = AppController::new();
    let pipeline = Pipeline::from_config(&config, controller.app_to_ui_tx());
    let state = Arc::new(AppState::new(config.clone(), pipeline));

    // Registered on the main thread, where the platform event loop runs
    let hotkey = HotkeyManager::from_combination(&config.hotkey.combination)?;
    tracing::info!("Hotkey registered ({})", config.hotkey.combination);

    let mut tasks = controller.spawn_tasks(state.clone(), hotkey.listener());

    let (app_to_ui_rx, ui_to_app_tx) = controller.ui_channels();
    let ui_result = ui::ui_loop(&config, app_to_ui_rx, ui_to_app_tx.clone());
    if let Err(e) = &ui_result {
        tracing::error!("UI exited with error: {:#}", e);
    }

    tracing::info!("Shutting down");
    runtime.block_on(async {
        if ui_to_app_tx.send(AppEvent::Shutdown).await.is_err() {
            tracing::debug!("Event loop already gone");
        }
        controller.shutdown();

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!("Task exited with error: {:#}", e),
                Err(e) => tracing::error!("Task panicked: {}", e),
            }
        }

        state.pipeline.shutdown().await;
    });

    drop(hotkey);
    drop(guard);
    runtime.shutdown_timeout(Duration::from_secs(2));
    ui_result
}
