//! Newline-delimited JSON-RPC over stdin/stdout.
//!
//! Every request line is handled on its own task so a long-polling tool call
//! does not hold up `tools/list` or `ping`. Responses and progress
//! notifications funnel through one writer task; stdout carries nothing else.

use std::sync::Arc;

use listenhub_core::{McpServer, OutboundMessage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::{BridgeError, Result};

const OUTBOUND_CAPACITY: usize = 64;

/// Serve the process's stdin/stdout until the host closes stdin
pub async fn serve_stdio(server: McpServer) -> Result<()> {
    info!(target: "bridge", "Stdio transport started");
    let reader = BufReader::new(tokio::io::stdin());
    serve_lines(server, reader, tokio::io::stdout()).await
}

/// Serve JSON-RPC lines from `reader`, writing responses to `writer`.
///
/// Returns once the reader hits EOF and every in-flight request has been
/// answered.
pub async fn serve_lines<R, W>(server: McpServer, reader: R, writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<OutboundMessage>(OUTBOUND_CAPACITY);
    let writer_task = tokio::spawn(write_messages(rx, writer));

    // progress is best effort: dropped rather than awaited when the writer lags
    let progress_tx = tx.clone();
    let server = server.with_notifier(Arc::new(move |notification| {
        if progress_tx
            .try_send(OutboundMessage::Notification(notification))
            .is_err()
        {
            debug!(target: "bridge", "Outbound queue full, dropping notification");
        }
    }));

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let server = server.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(response) = server.handle_line(&line).await {
                if tx.send(OutboundMessage::Response(response)).await.is_err() {
                    warn!(target: "bridge", "Writer gone, dropping response");
                }
            }
        });
    }
    debug!(target: "bridge", "Stdin closed, draining in-flight requests");

    // the writer stops once the last request task drops its sender and the
    // server clones holding the notifier are gone
    drop(server);
    drop(tx);
    writer_task
        .await
        .map_err(|e| BridgeError::Transport(format!("writer task failed: {}", e)))?
}

async fn write_messages<W>(mut rx: mpsc::Receiver<OutboundMessage>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let mut line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(e) => {
                error!(target: "bridge", error = %e, "Failed to encode message");
                continue;
            }
        };
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}
