use thiserror::Error;

use crate::hierarchy::Invalidation;

/// How a failure surfaces to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("Incorrect data: {0}")]
    Place(#[from] Invalidation),
    #[error("Incorrect username or password")]
    Credentials,
    #[error("No type")]
    NoVoteType,
    #[error("No text")]
    NoText,
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Incorrect username or password")]
    WrongCredentials,
    #[error("You're not the author")]
    NotTheAuthor,
    #[error("Not your vote")]
    NotYourVote,
    #[error("Place not found")]
    PlaceNotFound,
    #[error("Vote not found")]
    VoteNotFound,
    #[error("Reply not found")]
    ReplyNotFound,
    #[error("User not found")]
    UserNotFound,
}

impl Error {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Place(_) | Self::Credentials | Self::NoVoteType | Self::NoText => {
                ErrorKind::Validation
            }
            Self::Unauthorized | Self::WrongCredentials => ErrorKind::Unauthorized,
            Self::NotTheAuthor | Self::NotYourVote => ErrorKind::Forbidden,
            Self::PlaceNotFound | Self::VoteNotFound | Self::ReplyNotFound | Self::UserNotFound => {
                ErrorKind::NotFound
            }
            Self::UsernameTaken => ErrorKind::Conflict,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
