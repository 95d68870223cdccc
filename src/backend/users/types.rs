//! Row and wire types for profiles and follows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The viewer's own profile.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub avatar_path: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Another user's profile with public counts.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: i64,
    pub username: String,
    pub avatar_path: Option<String>,
    pub recipe_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
}

/// A row in a followers/following listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FollowListEntry {
    pub id: i64,
    pub username: String,
    pub avatar_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub followed_id: i64,
}

#[derive(Debug, Serialize)]
pub struct IsFollowingResponse {
    pub following: bool,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}
