use uuid::Uuid;
use visit_types::{
    api::{PlaceDetail, PlaceSummary, PlaceView},
    models::Place,
};

use crate::tally::tally;

/// The owner id is only shown to the owner.
fn visible_owner(place: &Place, requester: Option<Uuid>) -> Option<Uuid> {
    (requester == Some(place.user_id)).then_some(place.user_id)
}

pub fn summary(place: Place, requester: Option<Uuid>) -> PlaceSummary {
    let t = tally(&place.votes, requester);
    PlaceSummary {
        id: place.id,
        user_id: visible_owner(&place, requester),
        voted: t.voted,
        up: t.up,
        down: t.down,
        votes_length: place.votes.len(),
        address: place.address,
    }
}

pub fn detail(place: Place, requester: Option<Uuid>) -> PlaceDetail {
    let t = tally(&place.votes, requester);
    // Same "last one wins" rule as the tally.
    let user_vote = requester
        .and_then(|me| place.votes.iter().rev().find(|v| v.user_id == me))
        .cloned();
    PlaceDetail {
        id: place.id,
        user_id: visible_owner(&place, requester),
        voted: t.voted,
        up: t.up,
        down: t.down,
        user_vote,
        votes: place.votes,
        address: place.address,
    }
}

pub fn view(place: Place, requester: Option<Uuid>, extended: bool) -> PlaceView {
    if extended {
        PlaceView::Detail(detail(place, requester))
    } else {
        PlaceView::Summary(summary(place, requester))
    }
}
