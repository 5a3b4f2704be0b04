use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::{
    models::{ActionRequest, ErrorBody, ResetAck},
    services::ActionError,
    state::AppState,
};

/// Single action endpoint for the board
///
/// The request body carries an `action` tag plus its payload; the response
/// is the updated document, or a structured error. Polling clients call
/// `getState` here; everything else is a mutation.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `body` - JSON action body (anything unparseable is an invalid action)
pub async fn game_action(State(state): State<AppState>, body: Option<Json<Value>>) -> Response {
    let raw = body.map(|Json(value)| value).unwrap_or(Value::Null);

    let action: ActionRequest = match serde_json::from_value(raw) {
        Ok(action) => action,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody::message("Invalid action")),
            )
                .into_response();
        }
    };

    let engine = &state.engine;
    let game_id = state.game_id.as_str();

    let result = match action {
        ActionRequest::Init => engine.initialize(game_id).await.map(document_response),
        ActionRequest::GetState => engine.state(game_id).await.map(|doc| match doc {
            Some(doc) => Json(doc).into_response(),
            // No game yet; polling clients treat an empty object as "uncreated"
            None => Json(serde_json::json!({})).into_response(),
        }),
        ActionRequest::PickSquare {
            square_index,
            player,
            expected_version,
        } => engine
            .pick_square(game_id, square_index, &player, expected_version)
            .await
            .map(document_response),
        ActionRequest::LockBoard => engine
            .set_locked(game_id, true)
            .await
            .map(document_response),
        ActionRequest::UnlockBoard => engine
            .set_locked(game_id, false)
            .await
            .map(document_response),
        ActionRequest::SetScore {
            quarter,
            patriots,
            seahawks,
        } => engine
            .set_score(game_id, quarter, patriots, seahawks)
            .await
            .map(document_response),
        ActionRequest::SetWinner {
            quarter,
            square_index,
        } => engine
            .set_winner(game_id, quarter, square_index)
            .await
            .map(document_response),
        ActionRequest::ClearWinner { quarter } => engine
            .clear_winner(game_id, quarter)
            .await
            .map(document_response),
        ActionRequest::Reset => engine
            .reset(game_id)
            .await
            .map(|_| Json(ResetAck { success: true }).into_response()),
    };

    match result {
        Ok(response) => response,
        Err(err) => error_response(err),
    }
}

fn document_response(doc: crate::core::GameDocument) -> Response {
    Json(doc).into_response()
}

/// Map an engine rejection to its wire status and body
///
/// Conflicts are 409 with a machine-readable code; policy rejections and
/// malformed parameters are 400; exhaustion and faults are 500 and carry no
/// document, so the caller re-fetches via `getState`.
fn error_response(err: ActionError) -> Response {
    let message = err.to_string();

    match err {
        ActionError::VersionConflict { current } => (
            StatusCode::CONFLICT,
            Json(ErrorBody::conflict(message, *current)),
        )
            .into_response(),
        ActionError::SquareTaken { current, .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::with_state(message, *current)),
        )
            .into_response(),
        ActionError::BoardLocked
        | ActionError::LimitReached
        | ActionError::InvalidSquare(_)
        | ActionError::UnknownPlayer(_)
        | ActionError::NotInitialized => (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::message(message)),
        )
            .into_response(),
        ActionError::RetriesExhausted | ActionError::Corrupt(_) | ActionError::Store(_) => {
            tracing::error!("💥 Action failed: {}", message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::message(message)),
            )
                .into_response()
        }
    }
}
