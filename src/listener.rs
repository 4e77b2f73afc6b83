//! Async command listener.
//!
//! Reads the line-oriented command protocol from any buffered source (the
//! serial-over-stdin link in the binary) and dispatches parsed commands to
//! [`Controls`]. Runs as one extra concurrent unit beside the task runners
//! and exits on cancellation or end of input.

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::command;
use crate::control::Controls;

/// Consumes command lines until cancellation or EOF.
///
/// Malformed lines are dropped silently (debug-logged only), per the
/// protocol contract.
pub async fn listen<R>(reader: R, controls: Controls, token: CancellationToken)
where
    R: AsyncBufRead + Unpin,
{
    debug!("command listener started");
    let mut lines = reader.lines();
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    debug!(%line, "command received");
                    match command::parse(line, controls.cabin_count()) {
                        Some(cmd) => controls.dispatch(cmd),
                        None => debug!(%line, "command dropped"),
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(%err, "command read failed");
                    break;
                }
            }
        }
    }
    debug!("command listener stopped");
}
