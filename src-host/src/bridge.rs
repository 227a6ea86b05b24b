//! Stdio bridge
//!
//! Reads one [`UiRequest`] per line and writes one [`HostMessage`] per line.
//! Generations run as tasks so `cancel-generation` and read-only requests
//! are still served while a response streams in; everything else is handled
//! in arrival order.

use std::io;
use std::path::Path;
use std::sync::Arc;

use render_engine::MemoryScene;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::protocol::{HostMessage, UiRequest};
use crate::session::{Outbox, SharedSession};

/// Errors loading a scene seed file
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("Failed to read seed file: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Invalid(#[from] design_tokens::TokenSourceError),
}

/// Build the scene from a seed file, or an empty scene without one
pub async fn load_scene(path: Option<&Path>) -> Result<MemoryScene, SeedError> {
    let Some(path) = path else {
        return Ok(MemoryScene::default());
    };
    let contents = tokio::fs::read_to_string(path).await?;
    let scene = MemoryScene::from_json(&contents)?;
    log::info!("Seeded scene from {:?}", path);
    Ok(scene)
}

/// Serve requests from `input` until it closes, writing messages to `output`.
///
/// The current settings and design system are announced first. Returns the
/// writer once every message has been flushed.
pub async fn serve<R, W>(session: SharedSession, input: R, output: W) -> io::Result<W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_messages(rx, output));

    send_initial_state(&session, &tx).await;

    let mut lines = BufReader::new(input).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read request: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let request: UiRequest = match serde_json::from_str(&line) {
            Ok(request) => request,
            Err(e) => {
                log::warn!("Ignoring malformed request: {}", e);
                let _ = tx.send(HostMessage::error(format!("Invalid request: {}", e)));
                continue;
            }
        };

        match request {
            UiRequest::Generate { .. } => {
                let session = Arc::clone(&session);
                let tx = tx.clone();
                tokio::spawn(async move { session.handle(request, &tx).await });
            }
            request => session.handle(request, &tx).await,
        }
    }

    log::info!("Input closed, shutting down");
    session.cancel();
    drop(tx);

    writer
        .await
        .map_err(io::Error::other)?
}

async fn send_initial_state(session: &SharedSession, tx: &Outbox) {
    let _ = tx.send(HostMessage::SettingsLoaded {
        settings: session.settings(),
    });
    session.handle(UiRequest::RefreshDesignSystem, tx).await;
}

async fn write_messages<W>(
    mut rx: mpsc::UnboundedReceiver<HostMessage>,
    mut output: W,
) -> io::Result<W>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let mut line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to encode message: {}", e);
                continue;
            }
        };
        line.push('\n');
        output.write_all(line.as_bytes()).await?;
        output.flush().await?;
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::settings::{Settings, SettingsStore};
    use serde_json::Value;

    fn messages(output: &[u8]) -> Vec<Value> {
        String::from_utf8_lossy(output)
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn session(dir: &tempfile::TempDir) -> SharedSession {
        Arc::new(Session::new(
            MemoryScene::default(),
            SettingsStore::new(dir.path()),
            Settings::default(),
        ))
    }

    #[tokio::test]
    async fn test_announces_state_then_answers_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let input = concat!(
            r#"{"type":"render-design","document":{"name":"Hero","children":[{"type":"TEXT","characters":"Hi"}]}}"#,
            "\n",
            r#"{"type":"get-selection"}"#,
            "\n",
        );

        let output = serve(session(&dir), input.as_bytes(), Vec::new())
            .await
            .unwrap();
        let messages = messages(&output);

        let types: Vec<&str> = messages
            .iter()
            .map(|m| m["type"].as_str().unwrap())
            .collect();
        assert_eq!(
            types,
            vec![
                "settings-loaded",
                "design-system-loaded",
                "generation-complete",
                "selection-changed",
                "selection-changed",
            ]
        );
        assert_eq!(messages[2]["success"], true);
        assert_eq!(messages[4]["names"][0], "Hero");
    }

    #[tokio::test]
    async fn test_malformed_lines_are_reported_and_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let input = "not json\n\n{\"type\":\"get-selection\"}\n";

        let output = serve(session(&dir), input.as_bytes(), Vec::new())
            .await
            .unwrap();
        let messages = messages(&output);

        assert_eq!(messages[2]["type"], "error");
        assert!(messages[2]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request"));
        assert_eq!(messages[3]["type"], "selection-changed");
        assert_eq!(messages[3]["count"], 0);
    }

    #[tokio::test]
    async fn test_invalid_document_fails_generation_complete() {
        let dir = tempfile::tempdir().unwrap();
        let input = r#"{"type":"render-design","document":{"title":"nothing useful"}}"#;

        let output = serve(session(&dir), input.as_bytes(), Vec::new())
            .await
            .unwrap();
        let last = messages(&output).pop().unwrap();
        assert_eq!(last["type"], "generation-complete");
        assert_eq!(last["success"], false);
    }

    #[tokio::test]
    async fn test_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        std::fs::write(
            &path,
            r#"{"designSystem":{"components":[{"key":"k1","name":"Button"}]}}"#,
        )
        .unwrap();

        let scene = load_scene(Some(&path)).await.unwrap();
        assert_eq!(scene.design_system().components[0].name, "Button");
        assert!(load_scene(None).await.unwrap().design_system().components.is_empty());
        assert!(matches!(
            load_scene(Some(&dir.path().join("missing.json"))).await,
            Err(SeedError::Io(_))
        ));
    }
}
