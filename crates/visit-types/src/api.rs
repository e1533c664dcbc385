use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::models::{Address, User, Vote, VoteType};

// -- JWT Claims --

/// Session token claims. The same token travels in the session cookie or in an
/// `Authorization: Bearer` header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: Option<User>,
}

// -- Generic --

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
}

impl StatusResponse {
    pub const SUCCESS: Self = Self { status: "success" };
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub status: &'static str,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// -- Places --

/// Submitted place. The `no_*`/`omit_name` flags waive a hierarchy level.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlace {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub state_or_region: Option<String>,
    #[serde(default)]
    pub settlement: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub house: Option<String>,
    #[serde(default)]
    pub no_state_region: bool,
    #[serde(default)]
    pub no_settlement: bool,
    #[serde(default)]
    pub omit_name: bool,
}

/// List entry: counts only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(flatten)]
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voted: Option<VoteType>,
    pub up: usize,
    pub down: usize,
    pub votes_length: usize,
}

/// Single place with all its votes, comments and replies.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDetail {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(flatten)]
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voted: Option<VoteType>,
    pub up: usize,
    pub down: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_vote: Option<Vote>,
    pub votes: Vec<Vote>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlaceView {
    Summary(PlaceSummary),
    Detail(PlaceDetail),
}

// -- Votes --

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    /// `None`: field missing, `Some(None)`: explicit `null` which removes the vote.
    #[serde(default, rename = "type", deserialize_with = "present")]
    pub vote_type: Option<Option<VoteType>>,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    /// `None` unless the body carries a string.
    #[serde(default, deserialize_with = "string_only")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub status: &'static str,
    pub liked: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReply {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub reply_id: Option<Uuid>,
    #[serde(default)]
    pub reply_user_id: Option<Uuid>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn string_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Other(serde::de::IgnoredAny),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::Str(text) => Some(text),
        Text::Other(_) => None,
    })
}
