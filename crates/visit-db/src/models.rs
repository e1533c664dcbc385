//! Database row types. These map directly to SQLite rows and are converted
//! into `visit-types` documents by [`crate::documents`].

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
}

pub struct PlaceRow {
    pub id: String,
    pub user_id: String,
    pub country: String,
    pub state_or_region: Option<String>,
    pub settlement: Option<String>,
    pub name: Option<String>,
    pub street: Option<String>,
    pub house: Option<String>,
}

pub struct VoteRow {
    pub id: String,
    pub place_id: String,
    pub user_id: String,
    pub vote_type: String,
    pub text: Option<String>,
}

pub struct LikeRow {
    pub vote_id: String,
    pub user_id: String,
}

pub struct ReplyRow {
    pub id: String,
    pub vote_id: String,
    pub user_id: String,
    pub text: String,
    pub reply_id: Option<String>,
    pub reply_user_id: Option<String>,
}
