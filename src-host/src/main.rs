use std::path::PathBuf;
use std::sync::Arc;

use draftsmith::constants::paths::APP_DIR;
use draftsmith::{load_scene, serve, Session, SettingsStore, SharedSession};

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries protocol messages
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Draftsmith starting...");

    // Optional scene seed: {"designSystem": {...}, "fonts": [...]}
    let seed_path = std::env::args_os().nth(1).map(PathBuf::from);
    let scene = match load_scene(seed_path.as_deref()).await {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Failed to load scene: {}", e);
            std::process::exit(1);
        }
    };

    let store = SettingsStore::default_location().unwrap_or_else(|| {
        log::warn!("No config directory found; storing settings in ./{}", APP_DIR);
        SettingsStore::new(APP_DIR)
    });
    log::info!("Settings directory: {:?}", store.dir());

    let session: SharedSession = Arc::new(Session::open(scene, store).await);

    if let Err(e) = serve(session, tokio::io::stdin(), tokio::io::stdout()).await {
        log::error!("Bridge stopped: {}", e);
        std::process::exit(1);
    }
}
