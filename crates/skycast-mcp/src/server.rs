//! Stdio server loop.
//!
//! Newline-delimited JSON-RPC: one request per line on stdin, one response
//! per line on stdout. Requests are handled to completion one at a time,
//! matching the protocol's one-request-per-turn model. All logging goes to
//! stderr.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::handlers::Handlers;
use crate::protocol::{error_codes, Request, Response, JSONRPC_VERSION};

pub struct Server {
    handlers: Handlers,
}

impl Server {
    pub fn new(handlers: Handlers) -> Self {
        Self { handlers }
    }

    /// Serve requests until stdin reaches EOF.
    ///
    /// # Errors
    ///
    /// Returns an error when stdin cannot be read or a response cannot be
    /// written; per-request failures are answered in-band and never abort
    /// the loop.
    pub async fn run(&self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        info!("server ready, waiting for requests");

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            debug!(request = %line, "received");

            let Some(response) = self.handle_line(&line).await else {
                debug!("notification, no response");
                continue;
            };

            let raw = serde_json::to_string(&response)?;
            debug!(response = %raw, "sending");
            stdout.write_all(raw.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Parse and dispatch one input line.
    async fn handle_line(&self, line: &str) -> Option<Response> {
        let request: Request = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                warn!(%err, "failed to parse request");
                return Some(Response::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {err}"),
                ));
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(Response::error(
                request.id,
                error_codes::INVALID_REQUEST,
                "Invalid JSON-RPC version",
            ));
        }

        self.handlers.dispatch(request).await
    }
}
