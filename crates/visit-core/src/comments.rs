use uuid::Uuid;
use visit_types::models::{Place, Reply, Vote};

/// What a reply responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTarget {
    Comment,
    Reply(Uuid),
}

/// Votes that carry comment text, in their original order.
pub fn comments(votes: &[Vote]) -> impl Iterator<Item = &Vote> {
    votes.iter().filter(|v| v.is_comment())
}

pub fn reply_target(reply: &Reply) -> ReplyTarget {
    match reply.reply_id {
        Some(id) => ReplyTarget::Reply(id),
        None => ReplyTarget::Comment,
    }
}

pub fn find_vote(place: &Place, id: Uuid) -> Option<&Vote> {
    place.votes.iter().find(|v| v.id == id)
}

pub fn find_reply(vote: &Vote, id: Uuid) -> Option<&Reply> {
    vote.replies.iter().find(|r| r.id == id)
}

/// The reply `reply` responds to. Dangling references resolve to `None`.
pub fn parent<'a>(vote: &'a Vote, reply: &Reply) -> Option<&'a Reply> {
    match reply_target(reply) {
        ReplyTarget::Reply(id) => find_reply(vote, id),
        ReplyTarget::Comment => None,
    }
}

/// Author of the reply being answered: the parent's actual author when it
/// exists, otherwise whatever the client claimed.
pub fn reply_user_id(vote: &Vote, reply_id: Option<Uuid>, claimed: Option<Uuid>) -> Option<Uuid> {
    match reply_id {
        Some(id) => find_reply(vote, id).map(|r| r.user_id).or(claimed),
        None => None,
    }
}
