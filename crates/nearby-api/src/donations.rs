use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use serde::Deserialize;

use nearby_types::api::{Ack, CreateDonationAck, DonationAction};

use crate::convert;
use crate::state::{AppState, run_db};

/// Public donation feed length.
const PUBLIC_LIMIT: u32 = 20;

#[derive(Debug, Deserialize)]
pub struct DonationQuery {
    pub admin_code: Option<String>,
}

/// GET /donations — public callers get the recent paid donations with
/// contact and assignment fields stripped; a valid admin code unlocks the
/// full ledger. A wrong code degrades to the public view rather than
/// failing, matching the listing contract.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<DonationQuery>,
) -> Result<Response, StatusCode> {
    if state.is_admin(query.admin_code.as_deref()) {
        let rows = run_db(&state, |db| db.list_donations_admin()).await?;
        let donations: Vec<_> = rows.into_iter().map(convert::donation).collect();
        return Ok(Json(donations).into_response());
    }

    let rows = run_db(&state, |db| db.list_donations_public(PUBLIC_LIMIT)).await?;
    let donations: Vec<_> = rows.into_iter().map(convert::donation_public).collect();
    Ok(Json(donations).into_response())
}

/// POST /donations — create a donation or assign one to a recipient.
pub async fn action(
    State(state): State<AppState>,
    Json(action): Json<DonationAction>,
) -> Result<Response, StatusCode> {
    match action {
        DonationAction::CreateDonation {
            donor_name,
            donor_contact,
            amount,
            message,
        } => {
            if donor_name.trim().is_empty() || amount <= 0 {
                return Err(StatusCode::BAD_REQUEST);
            }

            let (name, contact, text) = (donor_name.clone(), donor_contact, message.clone());
            let donation_id = run_db(&state, move |db| {
                db.create_donation(&name, &contact, amount, &text)
            })
            .await?;

            state.notifier.send(format!(
                "New donation #{donation_id}: {amount} from {donor_name} — {message}"
            ));

            let payment_card = state.payment_card.clone();
            let payment_url =
                format!("https://www.tinkoff.ru/rm/p2p/?card={payment_card}&amount={amount}");

            Ok(Json(CreateDonationAck {
                success: true,
                donation_id,
                payment_card,
                payment_url,
            })
            .into_response())
        }

        DonationAction::AssignDonation {
            donation_id,
            assigned_to,
            admin_notes,
            admin_code,
        } => {
            state.check_admin(&admin_code)?;

            let updated = run_db(&state, move |db| {
                db.assign_donation(donation_id, &assigned_to, &admin_notes)
            })
            .await?;
            if updated == 0 {
                return Err(StatusCode::NOT_FOUND);
            }

            Ok(Json(Ack { success: true }).into_response())
        }
    }
}
