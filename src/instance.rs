//! Single instance per user session.
//!
//! The first process listens on a Unix socket. Later launches connect, ask
//! the running instance to show its window and exit.

use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::UiEvent;

const SHOW_REQUEST: &str = "show";

pub enum Instance {
    Primary(InstanceListener),
    /// Another process owns the session and was asked to show itself
    Secondary,
}

pub struct InstanceListener {
    listener: UnixListener,
    path: PathBuf,
}

/// Asks a running instance to show itself. Returns false when nobody answers.
pub async fn notify_running(path: &Path) -> bool {
    let Ok(mut stream) = UnixStream::connect(path).await else {
        return false;
    };
    let request = format!("{}\n", SHOW_REQUEST);
    match stream.write_all(request.as_bytes()).await {
        Ok(()) => {
            let _ = stream.shutdown().await;
            true
        }
        Err(e) => {
            warn!("Running instance did not accept the request: {}", e);
            false
        }
    }
}

pub async fn acquire(path: &Path) -> AppResult<Instance> {
    if notify_running(path).await {
        info!("Alarm Clock is already running, showing its window");
        return Ok(Instance::Secondary);
    }

    // Nobody answered, so any socket file left behind is stale
    if path.exists() {
        debug!("Removing stale socket {:?}", path);
        std::fs::remove_file(path)?;
    }
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let listener = UnixListener::bind(path)?;
    info!("Listening for other instances on {:?}", path);
    Ok(Instance::Primary(InstanceListener {
        listener,
        path: path.to_path_buf(),
    }))
}

impl InstanceListener {
    /// Forwards `show` requests to the UI until shutdown, then removes the socket.
    pub async fn serve(self, ui_tx: UnboundedSender<UiEvent>, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, _)) => {
                        let mut lines = BufReader::new(stream).lines();
                        if let Ok(Some(line)) = lines.next_line().await {
                            if line.trim() == SHOW_REQUEST {
                                info!("Another launch asked to show the window");
                                let _ = ui_tx.send(UiEvent::ShowWindow);
                            }
                        }
                    }
                    Err(e) => warn!("Instance socket accept failed: {}", e),
                },
                _ = shutdown.cancelled() => break,
            }
        }

        if let Err(e) = std::fs::remove_file(&self.path) {
            debug!("Could not remove {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test]
    async fn test_first_instance_is_primary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run").join("alarm-clock.sock");
        assert!(matches!(acquire(&path).await.unwrap(), Instance::Primary(_)));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_stale_socket_is_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alarm-clock.sock");
        std::fs::write(&path, "").unwrap();
        assert!(matches!(acquire(&path).await.unwrap(), Instance::Primary(_)));
    }

    #[tokio::test]
    async fn test_second_instance_reaches_first() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alarm-clock.sock");

        let Instance::Primary(listener) = acquire(&path).await.unwrap() else {
            panic!("expected primary");
        };
        let (tx, mut rx) = unbounded_channel();
        let shutdown = CancellationToken::new();
        let server = tokio::spawn(listener.serve(tx, shutdown.clone()));

        assert!(matches!(acquire(&path).await.unwrap(), Instance::Secondary));
        assert!(matches!(rx.recv().await, Some(UiEvent::ShowWindow)));

        shutdown.cancel();
        server.await.unwrap();
        assert!(!path.exists());
    }
}
