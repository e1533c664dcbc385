use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;
use tracing::debug;
use uuid::Uuid;

use visit_core::Error;
use visit_core::authorize::authorize_vote_text;
use visit_core::comments::find_vote;
use visit_core::id::new_id;
use visit_types::api::{CommentRequest, StatusResponse, VoteRequest};

use crate::auth::AppState;
use crate::blocking;
use crate::error::{ApiResult, JsonBody, PathParams};
use crate::middleware::CurrentUser;
use crate::places::load_place;

/// Casts, changes or (with `"type": null`) withdraws the requester's vote.
pub async fn vote(
    State(state): State<AppState>,
    WithRejection(Path(id), _): PathParams<Uuid>,
    user: CurrentUser,
    WithRejection(Json(req), _): JsonBody<VoteRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let vote_type = req.vote_type.ok_or(Error::NoVoteType)?;
    let voter = user.id();

    blocking(&state, move |s| {
        let (place, voter) = (id.to_string(), voter.to_string());
        let found = match vote_type {
            Some(t) => s
                .db
                .upsert_vote(&new_id().to_string(), &place, &voter, t)?,
            None => s.db.remove_vote(&place, &voter)?,
        };
        if found {
            Ok(())
        } else {
            Err(Error::PlaceNotFound.into())
        }
    })
    .await?;

    debug!("{} voted {:?} on {}", user.0.username, vote_type, id);
    Ok(Json(StatusResponse::SUCCESS))
}

/// Sets the comment on the requester's own vote. Empty text clears it.
pub async fn comment(
    State(state): State<AppState>,
    WithRejection(Path((id, vote_id)), _): PathParams<(Uuid, Uuid)>,
    user: CurrentUser,
    WithRejection(Json(req), _): JsonBody<CommentRequest>,
) -> ApiResult<Json<StatusResponse>> {
    let text = req.text.ok_or(Error::NoText)?;
    let voter = user.id();

    blocking(&state, move |s| {
        let place = load_place(s, id)?;
        let vote = find_vote(&place, vote_id).ok_or(Error::VoteNotFound)?;
        authorize_vote_text(vote, voter)?;

        let text = Some(text.as_str()).filter(|t| !t.is_empty());
        if s.db
            .set_vote_text(&id.to_string(), &vote_id.to_string(), &voter.to_string(), text)?
        {
            Ok(())
        } else {
            Err(Error::VoteNotFound.into())
        }
    })
    .await?;

    Ok(Json(StatusResponse::SUCCESS))
}
