//! Row and wire types for ratings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reaction kind on a rating. Stored as text ('like'/'dislike').
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "like" => Some(Self::Like),
            "dislike" => Some(Self::Dislike),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

/// One rating row in a recipe's rating list, with derived reaction counts
/// and the viewer's own reaction. Replies are hydrated separately.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RatingEntry {
    pub id: i64,
    pub user_id: i64,
    pub score: i16,
    pub comment: String,
    pub rated_at: DateTime<Utc>,
    pub username: String,
    pub avatar_path: Option<String>,
    pub likes: i64,
    pub dislikes: i64,
    /// "like", "dislike" or null.
    pub my_reaction: Option<String>,
    #[sqlx(skip)]
    pub replies: Vec<ReplyEntry>,
}

/// One reply, annotated with its author.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReplyEntry {
    pub id: i64,
    pub rating_id: i64,
    pub user_id: i64,
    pub body: String,
    pub replied_at: DateTime<Utc>,
    pub username: String,
    pub avatar_path: Option<String>,
}

/// Recipe-level rating stats. `avg_score` is unrounded and null when the
/// recipe has no ratings.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    pub total_ratings: i64,
    pub avg_score: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct RatingListResponse {
    pub stats: RatingStats,
    pub ratings: Vec<RatingEntry>,
}

/// Body of POST /recipes/{id}/avaliar. `score` is optional at the type level
/// so its absence maps to 400, not a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub score: Option<i16>,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ReactRequest {
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct ReactResponse {
    pub liked: bool,
    pub disliked: bool,
    pub likes: i64,
    pub dislikes: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyResponse {
    pub message: String,
    pub new_reply: ReplyEntry,
}
