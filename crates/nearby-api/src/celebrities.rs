use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use serde::Deserialize;

use nearby_types::api::{Ack, CELEBRITY_REQUEST_FEE, CelebrityAction, CreateCelebrityAck};

use crate::convert;
use crate::state::{AppState, run_db};

/// Public outreach feed length.
const PUBLIC_LIMIT: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct CelebrityQuery {
    pub admin_code: Option<String>,
}

/// GET /celebrities — public view hides rejected requests and the
/// requester's contact/notes; a valid admin code unlocks everything.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<CelebrityQuery>,
) -> Result<Response, StatusCode> {
    if state.is_admin(query.admin_code.as_deref()) {
        let rows = run_db(&state, |db| db.list_celebrity_requests_admin()).await?;
        let requests: Vec<_> = rows.into_iter().map(convert::celebrity_request).collect();
        return Ok(Json(requests).into_response());
    }

    let rows = run_db(&state, |db| db.list_celebrity_requests_public(PUBLIC_LIMIT)).await?;
    let requests: Vec<_> = rows
        .into_iter()
        .map(convert::celebrity_request_public)
        .collect();
    Ok(Json(requests).into_response())
}

/// POST /celebrities — create an outreach request or move one through its
/// moderation states (pending / approved / sent / rejected).
pub async fn action(
    State(state): State<AppState>,
    Json(action): Json<CelebrityAction>,
) -> Result<Response, StatusCode> {
    match action {
        CelebrityAction::CreateRequest {
            requester_name,
            requester_contact,
            celebrity_name,
            request_text,
        } => {
            if requester_name.trim().is_empty()
                || celebrity_name.trim().is_empty()
                || request_text.trim().is_empty()
            {
                return Err(StatusCode::BAD_REQUEST);
            }

            let (name, contact, celebrity, text) = (
                requester_name.clone(),
                requester_contact,
                celebrity_name.clone(),
                request_text,
            );
            let request_id = run_db(&state, move |db| {
                db.create_celebrity_request(&name, &contact, &celebrity, &text)
            })
            .await?;

            state.notifier.send(format!(
                "New celebrity request #{request_id}: {requester_name} -> {celebrity_name}"
            ));

            Ok(Json(CreateCelebrityAck {
                success: true,
                request_id,
                amount: CELEBRITY_REQUEST_FEE,
                payment_card: state.payment_card.clone(),
            })
            .into_response())
        }

        CelebrityAction::UpdateStatus {
            request_id,
            status,
            admin_notes,
            admin_code,
        } => {
            state.check_admin(&admin_code)?;

            let updated = run_db(&state, move |db| {
                db.update_celebrity_status(request_id, status.as_str(), &admin_notes)
            })
            .await?;
            if updated == 0 {
                return Err(StatusCode::NOT_FOUND);
            }

            Ok(Json(Ack { success: true }).into_response())
        }
    }
}
