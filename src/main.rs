use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};

use desk_clock::cli::{Cli, Commands};
use desk_clock::feature::FeatureRegistry;
use desk_clock::settings::{Settings, SettingsStore};
use desk_clock::tui::{TerminalBackend, Theme};
use desk_clock::window::{DeskClockSessions, HarnessSessions, SessionFactory, WindowController};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the UI, so logs go to a file (truncated on each run)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("desk-clock.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    info!("Starting desk-clock");

    let store = SettingsStore::open_default()?;
    let settings = store.load();
    let theme = Theme::new(settings.theme);

    match cli.command {
        Some(Commands::TryFeature(args)) => {
            let sessions = HarnessSessions::new(FeatureRegistry::with_builtin(), args.type_id, args.rows, args.cols);
            run_windows(WindowController::new(sessions, settings), theme)?;
        }
        None => {
            let controller =
                WindowController::new(DeskClockSessions::default(), settings).with_settings_store(store.clone());
            let settings = run_windows(controller, theme)?;
            if let Err(e) = store.save(&settings) {
                warn!("Failed to save settings on exit: {:#}", e);
            }
        }
    }

    info!("desk-clock stopped");
    Ok(())
}

/// Drive `controller` on the terminal until shutdown and hand back the
/// settings it ended with.
fn run_windows<F: SessionFactory>(
    mut controller: WindowController<F>,
    theme: Theme,
) -> Result<Settings> {
    controller.start().context("Failed to create windows")?;

    let mut backend = TerminalBackend::new(theme)?;
    let result = controller.run(&mut backend);
    backend.restore()?;

    if let Err(e) = &result {
        error!("Window loop failed: {:#}", e);
    }
    result.map(|()| controller.into_settings())
}
