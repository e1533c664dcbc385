use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;
use uuid::Uuid;

use visit_core::authorize::authenticated;
use visit_types::api::Claims;

use crate::auth::{AppState, SESSION_COOKIE};
use crate::error::ApiError;

/// Session token from an `Authorization: Bearer` header, falling back to the
/// session cookie.
fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|c| c.value().to_string())
    })
}

/// Validates the session token, if any, and stores its [`Claims`] in the request
/// extensions. Requests with a missing, expired or forged token carry on anonymously.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    if let Some(token) = session_token(req.headers()) {
        match decode::<Claims>(
            &token,
            &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(data) => {
                req.extensions_mut().insert(data.claims);
            }
            Err(e) => debug!("Ignoring session token: {}", e),
        }
    }
    next.run(req).await
}

/// The signed-in user. Rejects anonymous requests with 401.
pub struct CurrentUser(pub Claims);

impl CurrentUser {
    pub fn id(&self) -> Uuid {
        self.0.sub
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = authenticated(parts.extensions.get::<Claims>().cloned())?;
        Ok(Self(claims))
    }
}

/// Whoever is asking, signed in or not.
pub struct Requester(pub Option<Claims>);

impl Requester {
    pub fn id(&self) -> Option<Uuid> {
        self.0.as_ref().map(|c| c.sub)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Requester {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Claims>().cloned()))
    }
}
