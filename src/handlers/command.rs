use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use serde_json::Value;

use crate::types::extjson;
use crate::types::requests::{require_body, CommandRequest};
use crate::types::responses::CommandResponse;
use crate::types::{AppError, AppState};

/// Run a raw MongoDB command.
///
/// Body: `command` (object), optional `database` (default `admin`).
pub async fn run_command(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CommandResponse>, AppError> {
    let req = CommandRequest::from_body(require_body(payload)?)?;

    let result = state
        .mongo
        .database(&req.database)
        .run_command(req.command)
        .await?;

    Ok(Json(CommandResponse {
        database: req.database,
        result: extjson::document_to_json(result),
    }))
}
