//! Rating queries: upsert, list with reaction counts, reaction toggle,
//! replies, owner-only cascade delete.

use sqlx::PgPool;

use crate::backend::ratings::types::{RatingEntry, RatingStats, ReactResponse, ReactionKind, ReplyEntry};

/// Upsert a rating for (user, recipe). Returns `true` when a new rating was
/// created, `false` when an existing one was updated.
///
/// On update the score is always overwritten; the comment only when the new
/// one is non-blank after trimming, otherwise the previous comment stays.
pub async fn upsert_rating(
    pool: &PgPool,
    recipe_id: i64,
    user_id: i64,
    score: i16,
    comment: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let existing: Option<(i64, String)> =
        sqlx::query_as("SELECT id, comment FROM ratings WHERE user_id = $1 AND recipe_id = $2")
            .bind(user_id)
            .bind(recipe_id)
            .fetch_optional(pool)
            .await?;

    match existing {
        Some((rating_id, old_comment)) => {
            let new_comment = match comment.map(str::trim) {
                Some(c) if !c.is_empty() => c.to_string(),
                _ => old_comment,
            };

            sqlx::query("UPDATE ratings SET score = $1, comment = $2 WHERE id = $3")
                .bind(score)
                .bind(&new_comment)
                .bind(rating_id)
                .execute(pool)
                .await?;

            Ok(false)
        }
        None => {
            sqlx::query(
                "INSERT INTO ratings (recipe_id, user_id, score, comment) VALUES ($1, $2, $3, $4)",
            )
            .bind(recipe_id)
            .bind(user_id)
            .bind(score)
            .bind(comment.map(str::trim).unwrap_or(""))
            .execute(pool)
            .await?;

            Ok(true)
        }
    }
}

/// All ratings for a recipe, newest first, annotated with reaction counts,
/// the viewer's own reaction, and replies (oldest first).
pub async fn list_ratings(
    pool: &PgPool,
    viewer_id: i64,
    recipe_id: i64,
) -> Result<Vec<RatingEntry>, sqlx::Error> {
    let mut ratings = sqlx::query_as::<_, RatingEntry>(
        "SELECT a.id, a.user_id, a.score, a.comment, a.rated_at, \
                u.username, u.avatar_path, \
                (SELECT COUNT(*) FROM rating_reactions x \
                  WHERE x.rating_id = a.id AND x.kind = 'like') AS likes, \
                (SELECT COUNT(*) FROM rating_reactions x \
                  WHERE x.rating_id = a.id AND x.kind = 'dislike') AS dislikes, \
                (SELECT x.kind FROM rating_reactions x \
                  WHERE x.rating_id = a.id AND x.user_id = $1) AS my_reaction \
         FROM ratings a \
         JOIN users u ON u.id = a.user_id \
         WHERE a.recipe_id = $2 \
         ORDER BY a.rated_at DESC, a.id DESC",
    )
    .bind(viewer_id)
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    for rating in ratings.iter_mut() {
        rating.replies = replies_for_rating(pool, rating.id).await?;
    }

    Ok(ratings)
}

pub async fn rating_stats(pool: &PgPool, recipe_id: i64) -> Result<RatingStats, sqlx::Error> {
    sqlx::query_as::<_, RatingStats>(
        "SELECT COUNT(*) AS total_ratings, AVG(score)::float8 AS avg_score \
         FROM ratings WHERE recipe_id = $1",
    )
    .bind(recipe_id)
    .fetch_one(pool)
    .await
}

pub async fn rating_exists(pool: &PgPool, rating_id: i64) -> Result<bool, sqlx::Error> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM ratings WHERE id = $1)")
        .bind(rating_id)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}

pub async fn get_rating_owner(pool: &PgPool, rating_id: i64) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT user_id FROM ratings WHERE id = $1")
        .bind(rating_id)
        .fetch_optional(pool)
        .await
}

/// Three-state reaction toggle for (user, rating):
///
/// - no existing reaction: create with `kind`
/// - existing reaction of the same kind: delete (back to none)
/// - existing reaction of the other kind: switch to `kind`
///
/// Returns the resulting state plus fresh like/dislike totals.
pub async fn react(
    pool: &PgPool,
    rating_id: i64,
    user_id: i64,
    kind: ReactionKind,
) -> Result<ReactResponse, sqlx::Error> {
    let existing: Option<(i64, String)> = sqlx::query_as(
        "SELECT id, kind FROM rating_reactions WHERE rating_id = $1 AND user_id = $2",
    )
    .bind(rating_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let resulting: Option<ReactionKind> = match existing {
        None => {
            sqlx::query(
                "INSERT INTO rating_reactions (rating_id, user_id, kind) VALUES ($1, $2, $3)",
            )
            .bind(rating_id)
            .bind(user_id)
            .bind(kind.as_str())
            .execute(pool)
            .await?;
            Some(kind)
        }
        Some((reaction_id, old_kind)) if old_kind == kind.as_str() => {
            sqlx::query("DELETE FROM rating_reactions WHERE id = $1")
                .bind(reaction_id)
                .execute(pool)
                .await?;
            None
        }
        Some((reaction_id, _)) => {
            sqlx::query("UPDATE rating_reactions SET kind = $1 WHERE id = $2")
                .bind(kind.as_str())
                .bind(reaction_id)
                .execute(pool)
                .await?;
            Some(kind)
        }
    };

    let (likes, dislikes): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*) FILTER (WHERE kind = 'like'), \
                COUNT(*) FILTER (WHERE kind = 'dislike') \
         FROM rating_reactions WHERE rating_id = $1",
    )
    .bind(rating_id)
    .fetch_one(pool)
    .await?;

    Ok(ReactResponse {
        liked: resulting == Some(ReactionKind::Like),
        disliked: resulting == Some(ReactionKind::Dislike),
        likes,
        dislikes,
    })
}

pub async fn replies_for_rating(
    pool: &PgPool,
    rating_id: i64,
) -> Result<Vec<ReplyEntry>, sqlx::Error> {
    sqlx::query_as::<_, ReplyEntry>(
        "SELECT r.id, r.rating_id, r.user_id, r.body, r.replied_at, \
                u.username, u.avatar_path \
         FROM rating_replies r \
         JOIN users u ON u.id = r.user_id \
         WHERE r.rating_id = $1 \
         ORDER BY r.replied_at ASC, r.id ASC",
    )
    .bind(rating_id)
    .fetch_all(pool)
    .await
}

/// Append a reply and return it hydrated with its author.
pub async fn insert_reply(
    pool: &PgPool,
    rating_id: i64,
    user_id: i64,
    body: &str,
) -> Result<ReplyEntry, sqlx::Error> {
    let reply_id: i64 = sqlx::query_scalar(
        "INSERT INTO rating_replies (rating_id, user_id, body) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(rating_id)
    .bind(user_id)
    .bind(body)
    .fetch_one(pool)
    .await?;

    sqlx::query_as::<_, ReplyEntry>(
        "SELECT r.id, r.rating_id, r.user_id, r.body, r.replied_at, \
                u.username, u.avatar_path \
         FROM rating_replies r \
         JOIN users u ON u.id = r.user_id \
         WHERE r.id = $1",
    )
    .bind(reply_id)
    .fetch_one(pool)
    .await
}

pub async fn get_reply_owner(pool: &PgPool, reply_id: i64) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT user_id FROM rating_replies WHERE id = $1")
        .bind(reply_id)
        .fetch_optional(pool)
        .await
}

pub async fn delete_reply(pool: &PgPool, reply_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM rating_replies WHERE id = $1")
        .bind(reply_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a rating with its replies and reactions in one transaction.
pub async fn delete_rating_cascade(pool: &PgPool, rating_id: i64) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM rating_replies WHERE rating_id = $1")
        .bind(rating_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM rating_reactions WHERE rating_id = $1")
        .bind(rating_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM ratings WHERE id = $1")
        .bind(rating_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}
