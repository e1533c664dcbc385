use uuid::Uuid;
use visit_types::models::{Vote, VoteType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub up: usize,
    pub down: usize,
    /// The requester's own vote.
    pub voted: Option<VoteType>,
}

impl Tally {
    pub fn net(&self) -> i64 {
        self.up as i64 - self.down as i64
    }
}

/// Counts up and down votes in one pass.
///
/// Each user is expected to have at most one vote. Should that ever be
/// violated, the last vote of the requester in `votes` wins.
pub fn tally(votes: &[Vote], requester: Option<Uuid>) -> Tally {
    votes.iter().fold(Tally::default(), |mut acc, vote| {
        if requester == Some(vote.user_id) {
            acc.voted = Some(vote.vote_type);
        }
        match vote.vote_type {
            VoteType::Up => acc.up += 1,
            VoteType::Down => acc.down += 1,
        }
        acc
    })
}
