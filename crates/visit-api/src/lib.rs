//! HTTP surface of the place rating service.

pub mod auth;
pub mod error;
pub mod likes;
pub mod middleware;
pub mod places;
pub mod replies;
pub mod routes;
pub mod votes;

use tracing::error;

use crate::auth::{AppState, AppStateInner};
use crate::error::ApiError;

/// Runs blocking storage work off the async runtime.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })?
}
