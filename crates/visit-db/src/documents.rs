//! Assembly of place documents from their relational rows.

use std::collections::HashMap;

use anyhow::{Context, Result};
use uuid::Uuid;
use visit_types::models::{Address, Like, Place, Reply, Vote};

use crate::models::{LikeRow, PlaceRow, ReplyRow, VoteRow};

pub(crate) fn parse_id(id: &str) -> Result<Uuid> {
    id.parse().with_context(|| format!("Corrupt id '{}'", id))
}

fn parse_opt_id(id: Option<&str>) -> Result<Option<Uuid>> {
    id.map(parse_id).transpose()
}

/// Builds one document per place row, keeping the order of every row set.
pub fn assemble(
    places: Vec<PlaceRow>,
    votes: Vec<VoteRow>,
    likes: Vec<LikeRow>,
    replies: Vec<ReplyRow>,
) -> Result<Vec<Place>> {
    let mut likes_by_vote: HashMap<String, Vec<Like>> = HashMap::new();
    for like in likes {
        likes_by_vote.entry(like.vote_id).or_default().push(Like {
            user_id: parse_id(&like.user_id)?,
        });
    }

    let mut replies_by_vote: HashMap<String, Vec<Reply>> = HashMap::new();
    for reply in replies {
        let parsed = Reply {
            id: parse_id(&reply.id)?,
            user_id: parse_id(&reply.user_id)?,
            text: reply.text,
            reply_id: parse_opt_id(reply.reply_id.as_deref())?,
            reply_user_id: parse_opt_id(reply.reply_user_id.as_deref())?,
        };
        replies_by_vote.entry(reply.vote_id).or_default().push(parsed);
    }

    let mut votes_by_place: HashMap<String, Vec<Vote>> = HashMap::new();
    for vote in votes {
        let parsed = Vote {
            id: parse_id(&vote.id)?,
            user_id: parse_id(&vote.user_id)?,
            vote_type: vote
                .vote_type
                .parse()
                .with_context(|| format!("Corrupt vote '{}'", vote.id))?,
            text: vote.text.filter(|t| !t.is_empty()),
            likes: likes_by_vote.remove(&vote.id).unwrap_or_default(),
            replies: replies_by_vote.remove(&vote.id).unwrap_or_default(),
        };
        votes_by_place.entry(vote.place_id).or_default().push(parsed);
    }

    places
        .into_iter()
        .map(|row| {
            Ok(Place {
                id: parse_id(&row.id)?,
                user_id: parse_id(&row.user_id)?,
                votes: votes_by_place.remove(&row.id).unwrap_or_default(),
                address: Address {
                    country: row.country,
                    state_or_region: row.state_or_region,
                    settlement: row.settlement,
                    name: row.name,
                    street: row.street,
                    house: row.house,
                },
            })
        })
        .collect()
}
