use axum::{
    Json, Router, middleware,
    routing::{delete, get, patch, post},
};
use serde_json::{Value, json};

use crate::auth::{self, AppState};
use crate::middleware::authenticate;
use crate::{likes, places, replies, votes};

async fn health() -> Json<Value> {
    Json(json!({ "hello": "world" }))
}

/// All routes, with session tokens resolved for every request.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/sign-up", post(auth::sign_up))
        .route("/log-in", post(auth::log_in))
        .route("/log-out", post(auth::log_out))
        .route("/auth", get(auth::current_user))
        .route("/users/{id}", get(auth::get_user))
        .route("/places", get(places::list_places).post(places::create_place))
        .route(
            "/places/{id}",
            get(places::get_place)
                .patch(places::edit_place)
                .delete(places::delete_place),
        )
        .route("/places/{id}/votes", patch(votes::vote))
        .route("/places/{id}/votes/{vote_id}", patch(votes::comment))
        .route("/places/{id}/votes/{vote_id}/likes", patch(likes::toggle_like))
        .route(
            "/places/{id}/votes/{vote_id}/replies",
            post(replies::create_reply),
        )
        .route(
            "/places/{id}/votes/{vote_id}/replies/{reply_id}",
            delete(replies::delete_reply),
        )
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .with_state(state)
}
