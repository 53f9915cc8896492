//! Webhook HTTP server

use crate::error::{Error, Result};
use crate::mirror::{Disposition, Mirror};
use axum::Router;
use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Path GitLab merge request hooks are delivered to
pub const MERGE_REQUESTS_PATH: &str = "/mergerequests";

/// Largest webhook body read before the delivery is ignored
///
/// GitLab payloads carry the full merge request description, which can run to
/// several megabytes.
pub const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

impl IntoResponse for Disposition {
    fn into_response(self) -> Response {
        (self.status_code(), self.body()).into_response()
    }
}

/// Build the webhook router
pub fn router(mirror: Mirror) -> Router {
    Router::new()
        .route(MERGE_REQUESTS_PATH, post(merge_request_hook))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(mirror)
}

/// Handle one merge request delivery
///
/// The mirror runs on its own task: if the sender hangs up before we answer,
/// the cherry-picks already in flight still run to completion and get reported.
/// A body that cannot be read counts as malformed.
async fn merge_request_hook(
    State(mirror): State<Mirror>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Disposition {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            debug!(error = %e, "ignoring unreadable webhook body");
            return Disposition::Ignored;
        }
    };
    let task = tokio::spawn(async move { mirror.handle(&body).await });
    match task.await {
        Ok(disposition) => disposition,
        Err(e) => {
            error!(error = %e, "mirror task aborted");
            Disposition::FailedEarly
        }
    }
}

/// Serve webhooks on `listener` until ctrl-c
///
/// Refuses to start without branch mappings, since every event would be ignored.
pub async fn serve(listener: TcpListener, mirror: Mirror) -> Result<()> {
    if mirror.mapping().is_empty() {
        return Err(Error::Config("no branch mappings configured".to_string()));
    }
    let addr = listener.local_addr()?;
    info!(%addr, mappings = mirror.mapping().len(), "mr-mirror listening");

    axum::serve(listener, router(mirror))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("mr-mirror stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
