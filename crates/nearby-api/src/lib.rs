pub mod announcements;
pub mod celebrities;
mod convert;
pub mod donations;
pub mod notify;
pub mod payments;
pub mod responses;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};

use state::AppState;

/// Five resource endpoints: reads are GET with query parameters, every
/// mutation is a POST with an `action` discriminator in the JSON body.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/announcements",
            get(announcements::list).post(announcements::action),
        )
        .route("/payments", post(payments::action))
        .route("/responses", get(responses::list).post(responses::action))
        .route("/donations", get(donations::list).post(donations::action))
        .route(
            "/celebrities",
            get(celebrities::list).post(celebrities::action),
        )
        .with_state(state)
}
