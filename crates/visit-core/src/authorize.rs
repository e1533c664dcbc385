use uuid::Uuid;
use visit_types::models::{Place, Reply, Vote};

use crate::error::{Error, Result};

/// The requester's identity, or `Unauthorized` for anonymous requests.
pub fn authenticated<T>(requester: Option<T>) -> Result<T> {
    requester.ok_or(Error::Unauthorized)
}

/// Whether the owner may still edit or delete the place: nobody else has voted.
pub fn place_is_mutable(place: &Place, requester: Uuid) -> bool {
    place.user_id == requester
        && match place.votes.as_slice() {
            [] => true,
            [only] => only.user_id == requester,
            _ => false,
        }
}

pub fn authorize_place_mutation(place: &Place, requester: Uuid) -> Result<()> {
    if place_is_mutable(place, requester) {
        Ok(())
    } else {
        Err(Error::NotTheAuthor)
    }
}

pub fn authorize_vote_text(vote: &Vote, requester: Uuid) -> Result<()> {
    if vote.user_id == requester {
        Ok(())
    } else {
        Err(Error::NotYourVote)
    }
}

pub fn authorize_reply_deletion(reply: &Reply, requester: Uuid) -> Result<()> {
    if reply.user_id == requester {
        Ok(())
    } else {
        Err(Error::NotTheAuthor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tally::tests::vote;
    use visit_types::models::{Address, VoteType};

    fn place(owner: Uuid, voters: &[Uuid]) -> Place {
        Place {
            id: Uuid::new_v4(),
            user_id: owner,
            address: Address::default(),
            votes: voters.iter().map(|u| vote(*u, VoteType::Up)).collect(),
        }
    }

    #[test]
    fn anonymous_requests_are_unauthorized() {
        assert_eq!(authenticated::<Uuid>(None), Err(Error::Unauthorized));
        let me = Uuid::new_v4();
        assert_eq!(authenticated(Some(me)), Ok(me));
    }

    #[test]
    fn owner_may_mutate_untouched_place() {
        let owner = Uuid::new_v4();
        assert!(authorize_place_mutation(&place(owner, &[]), owner).is_ok());
        assert!(authorize_place_mutation(&place(owner, &[owner]), owner).is_ok());
    }

    #[test]
    fn community_engagement_freezes_the_place() {
        let owner = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        assert_eq!(
            authorize_place_mutation(&place(owner, &[a]), owner),
            Err(Error::NotTheAuthor)
        );
        assert_eq!(
            authorize_place_mutation(&place(owner, &[a, b]), owner),
            Err(Error::NotTheAuthor)
        );
        assert_eq!(
            authorize_place_mutation(&place(owner, &[owner, a]), owner),
            Err(Error::NotTheAuthor)
        );
    }

    #[test]
    fn strangers_may_not_mutate() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        assert_eq!(
            authorize_place_mutation(&place(owner, &[]), stranger),
            Err(Error::NotTheAuthor)
        );
    }

    #[test]
    fn votes_and_replies_belong_to_their_authors() {
        let me = Uuid::new_v4();
        let other = Uuid::new_v4();
        let mine = vote(me, VoteType::Down);
        assert!(authorize_vote_text(&mine, me).is_ok());
        assert_eq!(authorize_vote_text(&mine, other), Err(Error::NotYourVote));

        let reply = Reply {
            id: Uuid::new_v4(),
            user_id: me,
            text: "same".into(),
            reply_id: None,
            reply_user_id: None,
        };
        assert!(authorize_reply_deletion(&reply, me).is_ok());
        assert_eq!(authorize_reply_deletion(&reply, other), Err(Error::NotTheAuthor));
    }
}
