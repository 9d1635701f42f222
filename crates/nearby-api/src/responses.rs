use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use serde::Deserialize;

use nearby_types::api::{CreateResponseAck, ResponseAction, SendMessageAck};

use crate::convert;
use crate::state::{AppState, run_db};

#[derive(Debug, Deserialize)]
pub struct ResponseQuery {
    pub announcement_id: Option<i64>,
    pub response_id: Option<i64>,
}

/// GET /responses — two read shapes on one endpoint, discriminated by
/// query parameter: `?announcement_id=` lists a listing's responses
/// (newest first, with thread sizes), `?response_id=` lists a thread's
/// messages (oldest first). A listing nobody responded to yields an empty
/// list, not an error.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ResponseQuery>,
) -> Result<Response, StatusCode> {
    if let Some(response_id) = query.response_id {
        let rows = run_db(&state, move |db| db.list_messages(response_id)).await?;
        let messages: Vec<_> = rows.into_iter().map(convert::message).collect();
        return Ok(Json(messages).into_response());
    }

    if let Some(announcement_id) = query.announcement_id {
        let rows = run_db(&state, move |db| db.list_responses(announcement_id)).await?;
        let responses: Vec<_> = rows.into_iter().map(convert::response).collect();
        return Ok(Json(responses).into_response());
    }

    Err(StatusCode::BAD_REQUEST)
}

/// POST /responses — create a response or append to its chat thread.
pub async fn action(
    State(state): State<AppState>,
    Json(action): Json<ResponseAction>,
) -> Result<Response, StatusCode> {
    match action {
        ResponseAction::CreateResponse {
            announcement_id,
            responder_name,
            responder_contact,
            message,
        } => {
            if responder_name.trim().is_empty()
                || responder_contact.trim().is_empty()
                || message.trim().is_empty()
            {
                return Err(StatusCode::BAD_REQUEST);
            }

            let response_id = run_db(&state, move |db| {
                if !db.announcement_exists(announcement_id)? {
                    return Ok(None);
                }
                db.create_response(
                    announcement_id,
                    &responder_name,
                    &responder_contact,
                    &message,
                )
                .map(Some)
            })
            .await?
            .ok_or(StatusCode::NOT_FOUND)?;

            Ok(Json(CreateResponseAck {
                success: true,
                response_id,
            })
            .into_response())
        }

        ResponseAction::SendMessage {
            response_id,
            sender_name,
            message,
        } => {
            if sender_name.trim().is_empty() || message.trim().is_empty() {
                return Err(StatusCode::BAD_REQUEST);
            }

            let message_id = run_db(&state, move |db| {
                if !db.response_exists(response_id)? {
                    return Ok(None);
                }
                db.create_message(response_id, &sender_name, &message).map(Some)
            })
            .await?
            .ok_or(StatusCode::NOT_FOUND)?;

            Ok(Json(SendMessageAck {
                success: true,
                message_id,
            })
            .into_response())
        }
    }
}
