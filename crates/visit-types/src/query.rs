use serde::Deserialize;

/// Ordering of the place list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceSort {
    Votes,
    Upvotes,
    Downvotes,
    #[default]
    #[serde(alias = "positivity")]
    Positive,
    #[serde(alias = "negativity")]
    Negative,
    PositiveToNegative,
    NegativeToPositive,
    LastVoted,
    LastAdded,
    Comments,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceFilter {
    #[default]
    None,
    VotedByMe,
    CommentedByMe,
}

/// Ordering of the votes inside a single place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoteSort {
    Likes,
    #[default]
    LastAdded,
    UpvotesFirst,
    DownvotesFirst,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlacesQuery {
    #[serde(default)]
    pub sort: PlaceSort,
    #[serde(default)]
    pub filter: PlaceFilter,
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaceQuery {
    #[serde(default)]
    pub sort: VoteSort,
}
