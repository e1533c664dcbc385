use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use visit_core::Error;
use visit_core::comments::find_vote;
use visit_types::api::{LikeResponse, StatusResponse};

use crate::auth::AppState;
use crate::blocking;
use crate::error::{ApiResult, PathParams};
use crate::middleware::CurrentUser;
use crate::places::load_place;

pub async fn toggle_like(
    State(state): State<AppState>,
    WithRejection(Path((id, vote_id)), _): PathParams<(Uuid, Uuid)>,
    user: CurrentUser,
) -> ApiResult<Json<LikeResponse>> {
    let liker = user.id();

    let liked = blocking(&state, move |s| {
        let place = load_place(s, id)?;
        find_vote(&place, vote_id).ok_or(Error::VoteNotFound)?;
        let liked = s.db.toggle_like(&vote_id.to_string(), &liker.to_string())?;
        Ok(liked.ok_or(Error::VoteNotFound)?)
    })
    .await?;

    Ok(Json(LikeResponse {
        status: StatusResponse::SUCCESS.status,
        liked,
    }))
}
