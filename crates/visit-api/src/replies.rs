use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use visit_core::Error;
use visit_core::authorize::authorize_reply_deletion;
use visit_core::comments::{find_reply, find_vote, reply_user_id};
use visit_core::id::new_id;
use visit_types::api::{CreatedResponse, NewReply, StatusResponse};

use crate::auth::AppState;
use crate::blocking;
use crate::error::{ApiResult, JsonBody, PathParams};
use crate::middleware::CurrentUser;
use crate::places::load_place;

pub async fn create_reply(
    State(state): State<AppState>,
    WithRejection(Path((id, vote_id)), _): PathParams<(Uuid, Uuid)>,
    user: CurrentUser,
    WithRejection(Json(req), _): JsonBody<NewReply>,
) -> ApiResult<impl IntoResponse> {
    if req.text.trim().is_empty() {
        return Err(Error::NoText.into());
    }
    let author = user.id();
    let reply_id = new_id();

    blocking(&state, move |s| {
        let place = load_place(s, id)?;
        let vote = find_vote(&place, vote_id).ok_or(Error::VoteNotFound)?;
        let answered = reply_user_id(vote, req.reply_id, req.reply_user_id);

        let stored = s.db.insert_reply(
            &reply_id.to_string(),
            &vote_id.to_string(),
            &author.to_string(),
            &req.text,
            req.reply_id.map(|r| r.to_string()).as_deref(),
            answered.map(|u| u.to_string()).as_deref(),
        )?;
        if stored {
            Ok(())
        } else {
            Err(Error::VoteNotFound.into())
        }
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            status: StatusResponse::SUCCESS.status,
            id: reply_id,
        }),
    ))
}

pub async fn delete_reply(
    State(state): State<AppState>,
    WithRejection(Path((id, vote_id, reply_id)), _): PathParams<(Uuid, Uuid, Uuid)>,
    user: CurrentUser,
) -> ApiResult<Json<StatusResponse>> {
    let author = user.id();

    blocking(&state, move |s| {
        let place = load_place(s, id)?;
        let vote = find_vote(&place, vote_id).ok_or(Error::VoteNotFound)?;
        let reply = find_reply(vote, reply_id).ok_or(Error::ReplyNotFound)?;
        authorize_reply_deletion(reply, author)?;

        if s.db
            .delete_reply(&vote_id.to_string(), &reply_id.to_string(), &author.to_string())?
        {
            Ok(())
        } else {
            Err(Error::ReplyNotFound.into())
        }
    })
    .await?;

    Ok(Json(StatusResponse::SUCCESS))
}
