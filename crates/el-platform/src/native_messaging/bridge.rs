use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use el_core::activation::DeliveryMessage;
use el_core::ids::ExtensionAddress;
use el_core::ports::{ExtensionRuntimeError, ExtensionRuntimePort};
use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use super::framing::{read_message, write_message, MAX_NATIVE_MESSAGE_BYTES};

/// One request/reply exchange over a framed channel.
///
/// The writer is shut down after the request so the peer sees end of input.
/// The encoded request is wiped from memory once written.
pub async fn exchange<W, R, T>(
    writer: &mut W,
    reader: &mut R,
    request: &T,
) -> Result<Value, ExtensionRuntimeError>
where
    W: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_vec(request)
        .map(Zeroizing::new)
        .map_err(|e| ExtensionRuntimeError::Transport(e.to_string()))?;

    let write_result = write_message(writer, &payload).await;
    if let Err(err) = &write_result {
        // The peer may answer and exit before reading everything.
        debug!(error = %err, "request write failed, still waiting for a reply");
    }
    let _ = writer.shutdown().await;

    let reply = read_message(reader, MAX_NATIVE_MESSAGE_BYTES)
        .await
        .map_err(|e| ExtensionRuntimeError::Transport(e.to_string()))?;
    let Some(reply) = reply else {
        return Err(match write_result {
            Err(err) => ExtensionRuntimeError::Transport(err.to_string()),
            Ok(()) => ExtensionRuntimeError::NoReply,
        });
    };

    serde_json::from_slice(&reply).map_err(|e| ExtensionRuntimeError::InvalidReply(e.to_string()))
}

/// Extension runtime reached through a bridge executable.
pub struct NativeMessagingBridge {
    command: Option<PathBuf>,
}

impl NativeMessagingBridge {
    /// `None` or an empty path means no bridge is installed.
    pub fn new(command: Option<PathBuf>) -> Self {
        Self {
            command: command.filter(|path| !path.as_os_str().is_empty()),
        }
    }

    fn resolve_command(&self) -> Option<PathBuf> {
        let command = self.command.as_ref()?;
        if command.components().count() > 1 {
            return command.is_file().then(|| command.clone());
        }
        search_path(command)
    }
}

fn search_path(name: &Path) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[async_trait]
impl ExtensionRuntimePort for NativeMessagingBridge {
    fn is_available(&self) -> bool {
        self.resolve_command().is_some()
    }

    async fn send_message(
        &self,
        address: &ExtensionAddress,
        message: &DeliveryMessage<'_>,
    ) -> Result<Value, ExtensionRuntimeError> {
        let command = self
            .resolve_command()
            .ok_or(ExtensionRuntimeError::Unavailable)?;

        let mut child = Command::new(&command)
            .arg(address.as_str())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                warn!(command = %command.display(), error = %e, "failed to start bridge");
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtensionRuntimeError::Unavailable
                } else {
                    ExtensionRuntimeError::Transport(e.to_string())
                }
            })?;

        let (Some(mut stdin), Some(mut stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(ExtensionRuntimeError::Transport(
                "bridge stdio not captured".to_string(),
            ));
        };

        debug!(address = %address, bridge = %command.display(), "bridge started");
        let reply = exchange(&mut stdin, &mut stdout, message).await;
        drop(stdin);

        match child.try_wait() {
            Ok(Some(status)) => debug!(%status, "bridge exited"),
            Ok(None) => {
                let _ = child.start_kill();
            }
            Err(e) => debug!(error = %e, "bridge status unknown"),
        }
        reply
    }
}
