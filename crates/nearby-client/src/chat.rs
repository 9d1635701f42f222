use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use nearby_types::models::ChatMessage;

use crate::error::GatewayError;
use crate::gateway::Gateway;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Snapshot of a thread as seen by consumers: `None` until the first fetch
/// lands, so "still loading" and "no messages yet" stay distinguishable.
pub type ThreadSnapshot = Option<Vec<ChatMessage>>;

/// Polls one response's chat thread while its view is open.
///
/// The fetch is awaited inside the tick loop, so ticks are mutually
/// exclusive: a fetch slower than the interval delays the next tick rather
/// than stacking concurrent requests, and missed ticks are skipped instead
/// of bursting. Polling stops on [`stop`] and on drop.
///
/// [`stop`]: ChatPoller::stop
pub struct ChatPoller {
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl ChatPoller {
    pub fn spawn(
        gateway: Arc<Gateway>,
        response_id: i64,
        interval: Duration,
    ) -> (Self, watch::Receiver<ThreadSnapshot>) {
        Self::spawn_with(interval, move || {
            let gateway = gateway.clone();
            async move { gateway.messages(response_id).await }
        })
    }

    pub(crate) fn spawn_with<F, Fut>(
        interval: Duration,
        mut fetch: F,
    ) -> (Self, watch::Receiver<ThreadSnapshot>)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Vec<ChatMessage>, GatewayError>> + Send,
    {
        let (tx, rx) = watch::channel(None);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        match fetch().await {
                            Ok(messages) => {
                                tx.send_replace(Some(messages));
                            }
                            // Keep the previous snapshot; a transient
                            // failure must not blank the thread.
                            Err(e) => warn!("Chat poll failed: {}", e),
                        }
                    }
                }
            }
        });

        (
            Self {
                cancel,
                handle: Some(handle),
            },
            rx,
        )
    }

    /// Stop polling and wait for the loop to wind down.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for ChatPoller {
    fn drop(&mut self) {
        // An abandoned chat view must not leak its timer.
        self.cancel.cancel();
    }
}
