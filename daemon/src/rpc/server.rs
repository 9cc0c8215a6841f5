//! JSON-RPC server over stdin/stdout.
//!
//! Requests are read line by line from stdin. Responses and notifications
//! share one outbox channel drained by a writer task, so every line written
//! to stdout is a complete JSON document.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use log::{debug, error, info};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::auth::AuthClient;
use crate::config::DaemonConfig;
use crate::error::Result;
use crate::generation::SongGenerator;
use crate::provider::ConceptProvider;
use crate::session::Session;
use crate::types::Language;

use super::methods::handle_request;
use super::types::{
    CancelReason, GenerationCancelledParams, JsonRpcError, JsonRpcErrorResponse,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RequestId, SongGeneratedParams,
    JSONRPC_VERSION,
};

/// How long pending output may take to flush after shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Mutable state shared by request handlers and generation tasks.
pub struct ServerState {
    /// The user session.
    pub session: Session,
    /// Ticket and task of the running generation.
    active: Option<(u64, JoinHandle<()>)>,
    shutdown: bool,
}

impl ServerState {
    fn new(language: Language) -> Self {
        Self {
            session: Session::new(language),
            active: None,
            shutdown: false,
        }
    }

    /// Signals the server to shut down and stops any running generation.
    pub fn shutdown(&mut self) {
        self.shutdown = true;
        self.abort_active();
    }

    /// Returns true if shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown
    }

    /// Aborts the running generation task, returning its ticket.
    pub(super) fn abort_active(&mut self) -> Option<u64> {
        let (ticket, handle) = self.active.take()?;
        handle.abort();
        Some(ticket)
    }

    pub(super) fn set_active(&mut self, ticket: u64, handle: JoinHandle<()>) {
        self.active = Some((ticket, handle));
    }

    fn finish_active(&mut self, ticket: u64) {
        if matches!(self.active, Some((id, _)) if id == ticket) {
            self.active = None;
        }
    }
}

/// Handle to the daemon. Cheap to clone; clones share all state.
pub struct Server<P> {
    state: Arc<Mutex<ServerState>>,
    generator: Arc<SongGenerator<P>>,
    auth: Arc<AuthClient>,
    config: Arc<DaemonConfig>,
    outbox: UnboundedSender<String>,
}

impl<P> Clone for Server<P> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            generator: Arc::clone(&self.generator),
            auth: Arc::clone(&self.auth),
            config: Arc::clone(&self.config),
            outbox: self.outbox.clone(),
        }
    }
}

impl<P: ConceptProvider + 'static> Server<P> {
    /// Creates a server whose output lines are sent to `outbox`.
    pub fn new(config: DaemonConfig, provider: P, outbox: UnboundedSender<String>) -> Result<Self> {
        let auth = AuthClient::new(&config)?;
        info!("Auth deployment: {}", auth.mode());
        Ok(Self {
            state: Arc::new(Mutex::new(ServerState::new(config.language))),
            generator: Arc::new(SongGenerator::new(provider)),
            auth: Arc::new(auth),
            config: Arc::new(config),
            outbox,
        })
    }

    /// Locks the shared state. Never hold the guard across an await.
    pub fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    /// Sends a JSON-RPC notification to the client.
    pub fn send_notification<T: Serialize>(&self, method: &'static str, params: T) {
        let notification = JsonRpcNotification::new(method, params);
        match serde_json::to_string(&notification) {
            Ok(json) => self.send_line(json),
            Err(e) => error!("Failed to serialize {} notification: {}", method, e),
        }
    }

    /// Notifies the client that a generation was abandoned.
    pub fn notify_cancelled(&self, ticket: u64, reason: CancelReason) {
        info!("Generation {} cancelled ({:?})", ticket, reason);
        self.send_notification(
            "generation_cancelled",
            GenerationCancelledParams { ticket, reason },
        );
    }

    fn send_line(&self, line: String) {
        if self.outbox.send(line).is_err() {
            debug!("Output channel closed, dropping message");
        }
    }

    /// Spawns the generation task for `ticket`.
    pub(super) fn spawn_generation(
        &self,
        ticket: u64,
        prompt: String,
        language: Language,
    ) -> JoinHandle<()> {
        let server = self.clone();
        tokio::spawn(async move { server.run_generation(ticket, prompt, language).await })
    }

    async fn run_generation(&self, ticket: u64, prompt: String, language: Language) {
        debug!("Generation {} started", ticket);
        let song = self.generator.generate(&prompt, language).await;

        let accepted = {
            let mut state = self.lock();
            let accepted = state.session.complete_generation(ticket, song.clone());
            state.finish_active(ticket);
            accepted
        };

        if accepted {
            self.send_notification("song_generated", SongGeneratedParams { ticket, song });
        } else {
            debug!("Discarding stale result of generation {}", ticket);
        }
    }

    /// Processes a single JSON-RPC request line, returning the response.
    pub async fn process_request(&self, line: &str) -> Option<String> {
        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                let error = JsonRpcErrorResponse::new(
                    None,
                    JsonRpcError::parse_error(format!("Invalid JSON: {}", e)),
                );
                return serde_json::to_string(&error).ok();
            }
        };

        // Well-formed JSON that is not a request object.
        let id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(r) => r,
            Err(e) => {
                let error = JsonRpcErrorResponse::new(
                    id,
                    JsonRpcError::invalid_request(format!("Invalid request: {}", e)),
                );
                return serde_json::to_string(&error).ok();
            }
        };

        if request.jsonrpc != JSONRPC_VERSION {
            let error = JsonRpcErrorResponse::new(
                Some(request.id),
                JsonRpcError::invalid_request("Invalid JSON-RPC version (expected 2.0)"),
            );
            return serde_json::to_string(&error).ok();
        }

        debug!("Handling {}", request.method);
        match handle_request(&request.method, request.params, self).await {
            Ok(result) => serde_json::to_string(&JsonRpcResponse::new(request.id, result)).ok(),
            Err(error) => {
                debug!("{} failed: {}", request.method, error.message);
                serde_json::to_string(&JsonRpcErrorResponse::new(Some(request.id), error)).ok()
            }
        }
    }
}

/// Writes every outbox line to stdout until all senders are dropped.
async fn write_lines(mut rx: UnboundedReceiver<String>) {
    let mut stdout = tokio::io::stdout();
    while let Some(line) = rx.recv().await {
        let written = async {
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await
        }
        .await;
        if let Err(e) = written {
            error!("Error writing stdout: {}", e);
            break;
        }
    }
}

/// Runs the JSON-RPC server, reading from stdin and writing to stdout.
pub async fn run_server<P: ConceptProvider + 'static>(
    config: DaemonConfig,
    provider: P,
) -> Result<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_lines(rx));
    let server = Server::new(config, provider, tx)?;

    info!("JSON-RPC server started, waiting for requests...");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!("Error reading stdin: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        if let Some(response) = server.process_request(&line).await {
            server.send_line(response);
        }

        if server.lock().is_shutdown() {
            info!("Server shutdown requested");
            break;
        }
    }

    server.lock().shutdown();
    drop(server);
    if tokio::time::timeout(DRAIN_TIMEOUT, writer).await.is_err() {
        debug!("Output not fully drained before exit");
    }

    info!("JSON-RPC server stopped");
    Ok(())
}
