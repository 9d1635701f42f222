use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{error, warn};

use nearby_db::Database;

use crate::notify::Notifier;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    /// Shared moderator passcode. Every privileged action carries it and is
    /// re-checked here, server-side.
    pub admin_code: String,
    /// Card number shown to users as the manual bank-transfer target.
    pub payment_card: String,
    pub notifier: Notifier,
}

impl AppStateInner {
    pub fn check_admin(&self, code: &str) -> Result<(), StatusCode> {
        if code == self.admin_code {
            Ok(())
        } else {
            warn!("Privileged action rejected: wrong admin code");
            Err(StatusCode::FORBIDDEN)
        }
    }

    pub fn is_admin(&self, code: Option<&str>) -> bool {
        code == Some(self.admin_code.as_str())
    }
}

/// Outcome of a guarded status transition.
pub(crate) enum Transition {
    Applied,
    Missing,
    WrongState,
}

impl Transition {
    pub(crate) fn status_error(self) -> Result<(), StatusCode> {
        match self {
            Transition::Applied => Ok(()),
            Transition::Missing => Err(StatusCode::NOT_FOUND),
            Transition::WrongState => Err(StatusCode::CONFLICT),
        }
    }
}

/// Run a blocking DB closure off the async runtime.
pub(crate) async fn run_db<T, F>(state: &AppState, f: F) -> Result<T, StatusCode>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("Database error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
