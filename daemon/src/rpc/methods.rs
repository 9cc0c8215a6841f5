//! JSON-RPC method handlers.

use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::Credentials;
use crate::provider::ConceptProvider;

use super::server::Server;
use super::types::{
    parse_language, CancelReason, CancelResult, GenerateParams, GenerateResult, GenerationStatus,
    JsonRpcError, SelectParams, SetLanguageParams, SongsResult,
};

/// Handles a JSON-RPC method call.
pub async fn handle_request<P: ConceptProvider + 'static>(
    method: &str,
    params: Value,
    server: &Server<P>,
) -> Result<Value, JsonRpcError> {
    match method {
        "generate" => handle_generate(params, server),
        "cancel" => handle_cancel(server),
        "songs" => handle_songs(server),
        "select" => handle_select(params, server),
        "now_playing" => to_value(server.lock().session.now_playing()),
        "set_language" => handle_set_language(params, server),
        "session" => to_value(server.lock().session.snapshot()),
        "register" => handle_register(params, server).await,
        "ping" => handle_ping(server),
        "shutdown" => handle_shutdown(server),
        _ => Err(JsonRpcError::method_not_found(method)),
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, JsonRpcError> {
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
}

fn to_value<T: Serialize>(value: T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

/// Handles the ping method for health checks.
fn handle_ping<P: ConceptProvider + 'static>(server: &Server<P>) -> Result<Value, JsonRpcError> {
    let config = server.config();
    Ok(json!({
        "status": "ok",
        "deployment": config.deployment,
        "hasApiKey": config.has_api_key(),
    }))
}

/// Handles the shutdown method.
fn handle_shutdown<P: ConceptProvider + 'static>(
    server: &Server<P>,
) -> Result<Value, JsonRpcError> {
    server.lock().shutdown();
    Ok(json!({ "status": "shutting_down" }))
}

/// Handles the generate method.
///
/// The new request supersedes any running one; the superseded task is
/// aborted and a `generation_cancelled` notification is sent for it.
fn handle_generate<P: ConceptProvider + 'static>(
    params: Value,
    server: &Server<P>,
) -> Result<Value, JsonRpcError> {
    let params: GenerateParams = parse_params(params)?;
    params.validate()?;

    let (ticket, superseded, language) = {
        let mut state = server.lock();
        let language = params.resolve_language(state.session.language())?;
        let ticket = state.session.begin_generation(&params.prompt);
        state.abort_active();
        let handle = server.spawn_generation(ticket.id, params.prompt.clone(), language);
        state.set_active(ticket.id, handle);
        (ticket.id, ticket.superseded, language)
    };

    if let Some(old) = superseded {
        server.notify_cancelled(old, CancelReason::Superseded);
    }
    info!("Generation {} queued in {}", ticket, language);

    to_value(GenerateResult {
        ticket,
        status: GenerationStatus::Generating,
        language,
    })
}

/// Handles the cancel method.
fn handle_cancel<P: ConceptProvider + 'static>(server: &Server<P>) -> Result<Value, JsonRpcError> {
    let cancelled = {
        let mut state = server.lock();
        state.abort_active();
        state.session.cancel_generation()
    };

    let status = match cancelled {
        Some(ticket) => {
            server.notify_cancelled(ticket, CancelReason::Requested);
            GenerationStatus::Cancelled
        }
        None => GenerationStatus::Idle,
    };

    to_value(CancelResult {
        status,
        ticket: cancelled,
    })
}

/// Handles the songs method: generated songs followed by the catalog.
fn handle_songs<P: ConceptProvider + 'static>(server: &Server<P>) -> Result<Value, JsonRpcError> {
    let state = server.lock();
    to_value(SongsResult {
        language: state.session.language(),
        songs: state.session.display_songs(),
    })
}

/// Handles the select method.
fn handle_select<P: ConceptProvider + 'static>(
    params: Value,
    server: &Server<P>,
) -> Result<Value, JsonRpcError> {
    let params: SelectParams = parse_params(params)?;
    let mut state = server.lock();
    let song = state.session.select(&params.id)?;
    to_value(song)
}

/// Handles the set_language method.
fn handle_set_language<P: ConceptProvider + 'static>(
    params: Value,
    server: &Server<P>,
) -> Result<Value, JsonRpcError> {
    let params: SetLanguageParams = parse_params(params)?;
    let language = parse_language(&params.language)?;
    server.lock().session.set_language(language);
    Ok(json!({ "language": language }))
}

/// Handles the register method.
async fn handle_register<P: ConceptProvider + 'static>(
    params: Value,
    server: &Server<P>,
) -> Result<Value, JsonRpcError> {
    let credentials: Credentials = parse_params(params)?;
    let outcome = server.auth().register(&credentials).await?;
    Ok(json!({ "outcome": outcome }))
}
