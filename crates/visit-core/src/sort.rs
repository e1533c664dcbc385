//! Ordering and filtering of places and of the votes within a place.
//!
//! Every place ordering is descending by its key and breaks ties by place id
//! ascending, so results are deterministic.

use std::cmp::{Ordering, Reverse};

use uuid::Uuid;
use visit_types::{
    models::{Place, Vote, VoteType},
    query::{PlaceFilter, PlaceSort, VoteSort},
};

use crate::{comments::comments, id::timestamp_millis, tally::tally};

/// Quotient of two counts.
///
/// `n/0` is `+inf` for `n > 0`. `0/0` is undefined and ranks below every
/// defined ratio.
#[derive(Debug, Clone, Copy)]
pub struct Ratio(Option<f64>);

impl Ratio {
    pub fn of(numerator: usize, denominator: usize) -> Self {
        if numerator == 0 && denominator == 0 {
            Self(None)
        } else {
            Self(Some(numerator as f64 / denominator as f64))
        }
    }
}

impl PartialEq for Ratio {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ratio {}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (a, b) => a.is_some().cmp(&b.is_some()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Count(i64),
    Ratio(Ratio),
    Time(Option<u64>),
}

fn rank(place: &Place, sort: PlaceSort) -> Rank {
    let t = tally(&place.votes, None);
    match sort {
        PlaceSort::Votes => Rank::Count(place.votes.len() as i64),
        PlaceSort::Upvotes => Rank::Count(t.up as i64),
        PlaceSort::Downvotes => Rank::Count(t.down as i64),
        PlaceSort::Positive => Rank::Count(t.net()),
        PlaceSort::Negative => Rank::Count(-t.net()),
        PlaceSort::PositiveToNegative => Rank::Ratio(Ratio::of(t.up, t.down)),
        PlaceSort::NegativeToPositive => Rank::Ratio(Ratio::of(t.down, t.up)),
        PlaceSort::LastVoted => Rank::Time(
            place
                .votes
                .iter()
                .filter_map(|v| timestamp_millis(&v.id))
                .max(),
        ),
        PlaceSort::LastAdded => Rank::Time(timestamp_millis(&place.id)),
        PlaceSort::Comments => Rank::Count(comments(&place.votes).count() as i64),
    }
}

pub fn sort_places(places: &mut [Place], sort: PlaceSort) {
    places.sort_by_cached_key(|p| (Reverse(rank(p, sort)), p.id));
}

fn participates(place: &Place, filter: PlaceFilter, requester: Option<Uuid>) -> bool {
    let mine = |v: &Vote| requester == Some(v.user_id);
    match filter {
        PlaceFilter::None => true,
        PlaceFilter::VotedByMe => place.votes.iter().any(mine),
        PlaceFilter::CommentedByMe => comments(&place.votes).any(mine),
    }
}

/// Keeps places the requester took part in. Anonymous requesters took part in none.
pub fn filter_places(places: &mut Vec<Place>, filter: PlaceFilter, requester: Option<Uuid>) {
    places.retain(|p| participates(p, filter, requester));
}

pub fn sort_votes(votes: &mut [Vote], sort: VoteSort) {
    match sort {
        VoteSort::Likes => votes.sort_by_key(|v| (Reverse(v.likes.len()), v.id)),
        VoteSort::LastAdded => {
            votes.sort_by_cached_key(|v| Reverse((timestamp_millis(&v.id), v.id)))
        }
        // Stable partitions: relative order within each side is kept.
        VoteSort::UpvotesFirst => votes.sort_by_key(|v| v.vote_type != VoteType::Up),
        VoteSort::DownvotesFirst => votes.sort_by_key(|v| v.vote_type != VoteType::Down),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::id_at;
    use visit_types::models::{Address, Like};

    fn vote_at(millis: u64, vote_type: VoteType) -> Vote {
        Vote {
            id: id_at(millis),
            user_id: Uuid::new_v4(),
            vote_type,
            text: None,
            likes: vec![],
            replies: vec![],
        }
    }

    fn place_at(millis: u64, up: usize, down: usize) -> Place {
        let mut votes = Vec::new();
        for i in 0..up {
            votes.push(vote_at(millis + 1 + i as u64, VoteType::Up));
        }
        for i in 0..down {
            votes.push(vote_at(millis + 100 + i as u64, VoteType::Down));
        }
        Place {
            id: id_at(millis),
            user_id: Uuid::new_v4(),
            address: Address {
                country: "Russia".into(),
                ..Default::default()
            },
            votes,
        }
    }

    fn ids(places: &[Place]) -> Vec<Uuid> {
        places.iter().map(|p| p.id).collect()
    }

    #[test]
    fn positive_is_descending_by_net_score() {
        let mut places = vec![
            place_at(1_000, 1, 3),
            place_at(2_000, 4, 0),
            place_at(3_000, 2, 2),
            place_at(4_000, 0, 0),
            place_at(5_000, 5, 2),
        ];
        sort_places(&mut places, PlaceSort::Positive);

        let nets: Vec<i64> = places.iter().map(|p| tally(&p.votes, None).net()).collect();
        assert!(nets.windows(2).all(|w| w[0] >= w[1]), "{nets:?}");
        assert_eq!(nets, vec![4, 3, 0, 0, -2]);
    }

    #[test]
    fn ties_break_by_id_ascending() {
        let a = place_at(1_000, 1, 0);
        let b = place_at(2_000, 1, 0);
        let c = place_at(3_000, 1, 0);
        let mut places = vec![c.clone(), a.clone(), b.clone()];
        sort_places(&mut places, PlaceSort::Votes);
        assert_eq!(ids(&places), vec![a.id, b.id, c.id]);
    }

    #[test]
    fn negative_prefers_the_worst_score() {
        let good = place_at(1_000, 3, 0);
        let bad = place_at(2_000, 0, 2);
        let mut places = vec![good.clone(), bad.clone()];
        sort_places(&mut places, PlaceSort::Negative);
        assert_eq!(ids(&places), vec![bad.id, good.id]);
    }

    #[test]
    fn ratio_handles_zero_division_explicitly() {
        let only_up = place_at(1_000, 2, 0); // 2/0 = inf
        let balanced = place_at(2_000, 3, 1); // 3
        let empty = place_at(3_000, 0, 0); // 0/0
        let only_down = place_at(4_000, 0, 2); // 0
        let mut places = vec![
            empty.clone(),
            only_down.clone(),
            balanced.clone(),
            only_up.clone(),
        ];

        sort_places(&mut places, PlaceSort::PositiveToNegative);
        assert_eq!(
            ids(&places),
            vec![only_up.id, balanced.id, only_down.id, empty.id]
        );

        sort_places(&mut places, PlaceSort::NegativeToPositive);
        assert_eq!(
            ids(&places),
            vec![only_down.id, balanced.id, only_up.id, empty.id]
        );
    }

    #[test]
    fn recency_sorts_use_id_timestamps() {
        let old_place_new_vote = {
            let mut p = place_at(1_000, 0, 0);
            p.votes.push(vote_at(9_000, VoteType::Up));
            p
        };
        let new_place_old_vote = place_at(5_000, 1, 0);
        let unvoted = place_at(7_000, 0, 0);
        let mut places = vec![
            unvoted.clone(),
            new_place_old_vote.clone(),
            old_place_new_vote.clone(),
        ];

        sort_places(&mut places, PlaceSort::LastVoted);
        assert_eq!(
            ids(&places),
            vec![old_place_new_vote.id, new_place_old_vote.id, unvoted.id]
        );

        sort_places(&mut places, PlaceSort::LastAdded);
        assert_eq!(
            ids(&places),
            vec![unvoted.id, new_place_old_vote.id, old_place_new_vote.id]
        );
    }

    #[test]
    fn comments_count_only_non_empty_text() {
        let mut chatty = place_at(1_000, 2, 0);
        chatty.votes[0].text = Some("great".into());
        chatty.votes[1].text = Some("fine".into());
        let mut quiet = place_at(2_000, 3, 0);
        quiet.votes[0].text = Some(String::new());
        quiet.votes[1].text = Some("meh".into());

        let mut places = vec![quiet.clone(), chatty.clone()];
        sort_places(&mut places, PlaceSort::Comments);
        assert_eq!(ids(&places), vec![chatty.id, quiet.id]);
    }

    #[test]
    fn filters_by_participation() {
        let me = Uuid::new_v4();
        let mut voted = place_at(1_000, 1, 0);
        voted.votes[0].user_id = me;
        let mut commented = place_at(2_000, 1, 0);
        commented.votes[0].user_id = me;
        commented.votes[0].text = Some("hi".into());
        let untouched = place_at(3_000, 2, 1);
        let all = vec![voted.clone(), commented.clone(), untouched.clone()];

        let mut places = all.clone();
        filter_places(&mut places, PlaceFilter::None, Some(me));
        assert_eq!(places.len(), 3);

        let mut places = all.clone();
        filter_places(&mut places, PlaceFilter::VotedByMe, Some(me));
        assert_eq!(ids(&places), vec![voted.id, commented.id]);

        let mut places = all.clone();
        filter_places(&mut places, PlaceFilter::CommentedByMe, Some(me));
        assert_eq!(ids(&places), vec![commented.id]);

        let mut places = all;
        filter_places(&mut places, PlaceFilter::VotedByMe, None);
        assert!(places.is_empty());
    }

    #[test]
    fn vote_sorts() {
        let mut a = vote_at(1_000, VoteType::Down);
        let b = vote_at(2_000, VoteType::Up);
        let c = vote_at(3_000, VoteType::Down);
        let d = vote_at(4_000, VoteType::Up);
        a.likes = vec![Like { user_id: Uuid::new_v4() }, Like { user_id: Uuid::new_v4() }];
        let all = vec![a.clone(), b.clone(), c.clone(), d.clone()];
        let vote_ids = |votes: &[Vote]| votes.iter().map(|v| v.id).collect::<Vec<_>>();

        let mut votes = all.clone();
        sort_votes(&mut votes, VoteSort::LastAdded);
        assert_eq!(vote_ids(&votes), vec![d.id, c.id, b.id, a.id]);

        let mut votes = all.clone();
        sort_votes(&mut votes, VoteSort::Likes);
        assert_eq!(vote_ids(&votes), vec![a.id, b.id, c.id, d.id]);

        let mut votes = all.clone();
        sort_votes(&mut votes, VoteSort::UpvotesFirst);
        assert_eq!(vote_ids(&votes), vec![b.id, d.id, a.id, c.id]);

        let mut votes = all;
        sort_votes(&mut votes, VoteSort::DownvotesFirst);
        assert_eq!(vote_ids(&votes), vec![a.id, c.id, b.id, d.id]);
    }
}
