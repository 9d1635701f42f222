use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use nearby_db::queries::AnnouncementFilter;
use nearby_types::api::{Ack, AnnouncementAction};
use nearby_types::models::{Announcement, Tier, VisitStats};

use crate::convert;
use crate::state::{AppState, Transition, run_db};

#[derive(Debug, Deserialize)]
pub struct AnnouncementQuery {
    pub author: Option<String>,
    #[serde(rename = "type")]
    pub tier: Option<Tier>,
    pub admin_code: Option<String>,
}

/// GET /announcements — the browse feed.
///
/// Public callers see published listings only. `?author=` returns that
/// author's listings in every status (self-service tracking), `?type=`
/// filters by tier, and a valid `?admin_code=` unlocks all statuses plus
/// the contact/expiry fields.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<AnnouncementQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let unlocked = state.is_admin(query.admin_code.as_deref());
    let filter = AnnouncementFilter {
        author: query.author,
        tier: query.tier.map(|t| t.as_str().to_string()),
        include_unpublished: unlocked,
    };

    let rows = run_db(&state, move |db| db.list_announcements(&filter)).await?;

    let listings: Vec<Announcement> = rows
        .into_iter()
        .map(|row| convert::announcement(row, unlocked))
        .collect();

    Ok(Json(listings))
}

/// POST /announcements — close, delete, view/visit tracking, stats.
pub async fn action(
    State(state): State<AppState>,
    Json(action): Json<AnnouncementAction>,
) -> Result<Response, StatusCode> {
    match action {
        AnnouncementAction::Close { id } => {
            let outcome = run_db(&state, move |db| {
                if db.close_announcement(id)? == 1 {
                    return Ok(Transition::Applied);
                }
                Ok(match db.get_announcement(id)? {
                    None => Transition::Missing,
                    Some(_) => Transition::WrongState,
                })
            })
            .await?;
            outcome.status_error()?;
            Ok(Json(Ack { success: true }).into_response())
        }

        AnnouncementAction::Delete { id, admin_code } => {
            state.check_admin(&admin_code)?;
            let deleted = run_db(&state, move |db| db.delete_announcement(id)).await?;
            if deleted == 0 {
                return Err(StatusCode::NOT_FOUND);
            }
            Ok(Json(Ack { success: true }).into_response())
        }

        AnnouncementAction::TrackView { id } => {
            let updated = run_db(&state, move |db| db.increment_views(id)).await?;
            if updated == 0 {
                return Err(StatusCode::NOT_FOUND);
            }
            Ok(Json(Ack { success: true }).into_response())
        }

        AnnouncementAction::TrackVisit { visitor_key } => {
            let key = visitor_key.unwrap_or_else(|| "anonymous".to_string());
            run_db(&state, move |db| db.record_visit(&key)).await?;
            Ok(Json(Ack { success: true }).into_response())
        }

        AnnouncementAction::GetStats { admin_code } => {
            state.check_admin(&admin_code)?;
            let row = run_db(&state, |db| db.visit_stats()).await?;
            Ok(Json(VisitStats {
                total_visits: row.total_visits,
                unique_visitors: row.unique_visitors,
                today_visits: row.today_visits,
                total_announcement_views: row.total_announcement_views,
            })
            .into_response())
        }
    }
}
