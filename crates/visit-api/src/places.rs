use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use tracing::{debug, info};
use uuid::Uuid;

use visit_core::authorize::authorize_place_mutation;
use visit_core::hierarchy::validate;
use visit_core::id::new_id;
use visit_core::page::{PAGE_LENGTH, Page, paginate};
use visit_core::sort::{filter_places, sort_places, sort_votes};
use visit_core::view::view;
use visit_core::Error;
use visit_types::api::{CreatedResponse, NewPlace, PlaceView, StatusResponse};
use visit_types::models::Place;
use visit_types::query::{PlaceQuery, PlacesQuery};

use crate::auth::{AppState, AppStateInner};
use crate::blocking;
use crate::error::{ApiResult, JsonBody, PathParams, QueryParams};
use crate::middleware::{CurrentUser, Requester};

pub(crate) fn load_place(state: &AppStateInner, id: Uuid) -> ApiResult<Place> {
    Ok(state
        .db
        .place(&id.to_string())?
        .ok_or(Error::PlaceNotFound)?)
}

/// Search, then sort, then filter, then cut out the requested page.
pub async fn list_places(
    State(state): State<AppState>,
    requester: Requester,
    WithRejection(Query(query), _): QueryParams<PlacesQuery>,
) -> ApiResult<Json<Vec<PlaceView>>> {
    let me = requester.id();
    let views = blocking(&state, move |s| {
        let mut places = s.db.places(query.search.as_deref())?;
        sort_places(&mut places, query.sort);
        filter_places(&mut places, query.filter, me);

        let page = query.page.map(Page::new).unwrap_or_default();
        Ok(paginate(places, page, PAGE_LENGTH)
            .into_iter()
            .map(|p| view(p, me, false))
            .collect::<Vec<_>>())
    })
    .await?;

    Ok(Json(views))
}

pub async fn get_place(
    State(state): State<AppState>,
    WithRejection(Path(id), _): PathParams<Uuid>,
    requester: Requester,
    WithRejection(Query(query), _): QueryParams<PlaceQuery>,
) -> ApiResult<Json<PlaceView>> {
    let me = requester.id();
    let detail = blocking(&state, move |s| {
        let mut place = load_place(s, id)?;
        sort_votes(&mut place.votes, query.sort);
        Ok(view(place, me, true))
    })
    .await?;

    Ok(Json(detail))
}

pub async fn create_place(
    State(state): State<AppState>,
    user: CurrentUser,
    WithRejection(Json(req), _): JsonBody<NewPlace>,
) -> ApiResult<impl IntoResponse> {
    let address = validate(req).map_err(Error::from)?;
    let id = new_id();
    let owner = user.id();

    blocking(&state, move |s| {
        s.db.insert_place(&id.to_string(), &owner.to_string(), &address)?;
        Ok(())
    })
    .await?;

    info!("{} added place {}", user.0.username, id);
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            status: StatusResponse::SUCCESS.status,
            id,
        }),
    ))
}

pub async fn edit_place(
    State(state): State<AppState>,
    WithRejection(Path(id), _): PathParams<Uuid>,
    user: CurrentUser,
    WithRejection(Json(req), _): JsonBody<NewPlace>,
) -> ApiResult<Json<StatusResponse>> {
    let address = validate(req).map_err(Error::from)?;
    let owner = user.id();

    blocking(&state, move |s| {
        let place = load_place(s, id)?;
        authorize_place_mutation(&place, owner)?;
        if !s
            .db
            .update_place_guarded(&id.to_string(), &owner.to_string(), &address)?
        {
            debug!("Place {} changed under the edit guard", id);
            return Err(guard_failure(s, id)?.into());
        }
        Ok(())
    })
    .await?;

    Ok(Json(StatusResponse::SUCCESS))
}

pub async fn delete_place(
    State(state): State<AppState>,
    WithRejection(Path(id), _): PathParams<Uuid>,
    user: CurrentUser,
) -> ApiResult<Json<StatusResponse>> {
    let owner = user.id();

    blocking(&state, move |s| {
        let place = load_place(s, id)?;
        authorize_place_mutation(&place, owner)?;
        if !s.db.delete_place_guarded(&id.to_string(), &owner.to_string())? {
            debug!("Place {} changed under the delete guard", id);
            return Err(guard_failure(s, id)?.into());
        }
        Ok(())
    })
    .await?;

    info!("{} deleted place {}", user.0.username, id);
    Ok(Json(StatusResponse::SUCCESS))
}

/// Why a guarded mutation touched nothing: the place is gone, or someone voted
/// in the meantime.
fn guard_failure(state: &AppStateInner, id: Uuid) -> ApiResult<Error> {
    Ok(match state.db.place(&id.to_string())? {
        Some(_) => Error::NotTheAuthor,
        None => Error::PlaceNotFound,
    })
}
