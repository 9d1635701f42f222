use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use nearby_types::api::{Ack, CreatePaymentAck, PaymentAction, PaymentStatus};
use nearby_types::models::{AnnouncementStatus, Tier};

use crate::state::{AppState, Transition, run_db};

/// VIP listings expire after a week; other tiers stay until closed.
const VIP_EXPIRY_DAYS: i64 = 7;

/// POST /payments — the manual bank-transfer flow.
///
/// `create_payment` inserts the listing in `pending_payment` and hands back
/// the transfer target; a moderator later verifies the transfer arrived and
/// calls `confirm_payment`, which publishes it.
pub async fn action(
    State(state): State<AppState>,
    Json(action): Json<PaymentAction>,
) -> Result<Response, StatusCode> {
    match action {
        PaymentAction::CreatePayment {
            title,
            description,
            category,
            author_name,
            author_contact,
            tier,
        } => {
            if title.trim().is_empty()
                || description.trim().is_empty()
                || category.trim().is_empty()
                || author_name.trim().is_empty()
            {
                return Err(StatusCode::BAD_REQUEST);
            }

            let amount = tier.price();
            let expires_days = (tier == Tier::Vip).then_some(VIP_EXPIRY_DAYS);

            let announcement_id = run_db(&state, move |db| {
                db.create_announcement(
                    &title,
                    &description,
                    &category,
                    &author_name,
                    &author_contact,
                    tier.as_str(),
                    amount,
                    expires_days,
                )
            })
            .await?;

            Ok(Json(CreatePaymentAck {
                success: true,
                announcement_id,
                amount,
                payment_card: state.payment_card.clone(),
                payment_status: AnnouncementStatus::PendingPayment.as_str().to_string(),
            })
            .into_response())
        }

        PaymentAction::CheckPayment { announcement_id } => {
            let row = run_db(&state, move |db| db.get_announcement(announcement_id))
                .await?
                .ok_or(StatusCode::NOT_FOUND)?;

            Ok(Json(PaymentStatus {
                payment_status: row.status,
                amount: row.payment_amount,
            })
            .into_response())
        }

        PaymentAction::ConfirmPayment {
            announcement_id,
            admin_code,
        } => {
            state.check_admin(&admin_code)?;

            let outcome = run_db(&state, move |db| {
                if db.confirm_payment(announcement_id)? == 1 {
                    return Ok(Transition::Applied);
                }
                Ok(match db.get_announcement(announcement_id)? {
                    None => Transition::Missing,
                    Some(_) => Transition::WrongState,
                })
            })
            .await?;
            outcome.status_error()?;

            Ok(Json(Ack { success: true }).into_response())
        }
    }
}
