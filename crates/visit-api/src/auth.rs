use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{debug, info};
use uuid::Uuid;

use visit_core::{Error, id::new_id};
use visit_db::Database;
use visit_types::api::{Claims, CredentialsRequest, StatusResponse, UserResponse};
use visit_types::models::User;

use crate::blocking;
use crate::error::{ApiResult, JsonBody, PathParams};
use crate::middleware::Requester;

pub const SESSION_COOKIE: &str = "session";

const MAX_CREDENTIAL_CHARS: usize = 100;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub session_hours: i64,
}

fn check_credentials(req: &CredentialsRequest) -> Result<(), Error> {
    let fits = |s: &str| (1..=MAX_CREDENTIAL_CHARS).contains(&s.chars().count());
    if fits(&req.username) && fits(&req.password) {
        Ok(())
    } else {
        Err(Error::Credentials)
    }
}

pub async fn sign_up(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(req), _): JsonBody<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    check_credentials(&req)?;

    let user = blocking(&state, move |s| {
        // Spares the hashing; the insert settles races.
        if s.db.get_user_by_username(&req.username)?.is_some() {
            return Err(Error::UsernameTaken.into());
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow!("Password hashing failed: {}", e))?
            .to_string();

        let id = new_id();
        if !s.db.create_user(&id.to_string(), &req.username, &password_hash)? {
            return Err(Error::UsernameTaken.into());
        }
        Ok(User {
            id,
            username: req.username,
        })
    })
    .await?;

    info!("New user {} ({})", user.username, user.id);
    let token = create_token(&state, &user)?;
    Ok((
        StatusCode::CREATED,
        jar.add(session_cookie(token)),
        Json(UserResponse { user: Some(user) }),
    ))
}

pub async fn log_in(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(req), _): JsonBody<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = blocking(&state, move |s| {
        let row = s
            .db
            .get_user_by_username(&req.username)?
            .ok_or(Error::WrongCredentials)?;

        let parsed_hash =
            PasswordHash::new(&row.password).map_err(|e| anyhow!("Corrupt password hash: {}", e))?;
        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| Error::WrongCredentials)?;

        let id = row
            .id
            .parse()
            .map_err(|e| anyhow!("Corrupt user id '{}': {}", row.id, e))?;
        Ok(User {
            id,
            username: row.username,
        })
    })
    .await?;

    debug!("{} logged in", user.username);
    let token = create_token(&state, &user)?;
    Ok((
        jar.add(session_cookie(token)),
        Json(UserResponse { user: Some(user) }),
    ))
}

/// Clears the session cookie. Tokens are stateless, so a copy held elsewhere
/// (e.g. sent as a Bearer header) stays valid until its `exp`.
pub async fn log_out(jar: CookieJar) -> impl IntoResponse {
    (
        jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/")),
        Json(StatusResponse::SUCCESS),
    )
}

pub async fn current_user(Requester(claims): Requester) -> Json<UserResponse> {
    Json(UserResponse {
        user: claims.map(|c| User {
            id: c.sub,
            username: c.username,
        }),
    })
}

pub async fn get_user(
    State(state): State<AppState>,
    WithRejection(Path(id), _): PathParams<Uuid>,
) -> ApiResult<Json<User>> {
    let row = blocking(&state, move |s| {
        Ok(s.db.get_user_by_id(&id.to_string())?.ok_or(Error::UserNotFound)?)
    })
    .await?;

    Ok(Json(User {
        id,
        username: row.username,
    }))
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

fn create_token(state: &AppStateInner, user: &User) -> anyhow::Result<String> {
    let expires = chrono::Duration::try_hours(state.session_hours)
        .and_then(|lifetime| chrono::Utc::now().checked_add_signed(lifetime))
        .ok_or_else(|| {
            anyhow!("Session lifetime of {} hours is out of range", state.session_hours)
        })?;
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        exp: expires.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.jwt_secret.as_bytes()),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(username: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn out_of_range_session_lifetime_is_an_error() {
        let state = AppStateInner {
            db: Database::open_in_memory().unwrap(),
            jwt_secret: "secret".into(),
            session_hours: i64::MAX,
        };
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
        };
        assert!(create_token(&state, &user).is_err());

        let state = AppStateInner {
            session_hours: 7,
            ..state
        };
        assert!(create_token(&state, &user).is_ok());
    }

    #[test]
    fn credentials_need_one_to_a_hundred_chars() {
        assert!(check_credentials(&credentials("a", "b")).is_ok());
        assert!(check_credentials(&credentials(&"я".repeat(100), "pw")).is_ok());
        assert_eq!(
            check_credentials(&credentials("", "pw")),
            Err(Error::Credentials)
        );
        assert_eq!(
            check_credentials(&credentials("alice", &"x".repeat(101))),
            Err(Error::Credentials)
        );
    }
}
