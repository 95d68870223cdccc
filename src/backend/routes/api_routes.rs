//! API route tables.
//!
//! Two groups: public routes (registration, login, password reset, the tag
//! catalog) and bearer-protected routes (everything touching a specific
//! user's data). The protected group carries the auth middleware as a
//! `route_layer`, so unmatched paths still fall through to the 404 handler
//! rather than a 401.

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::backend::auth::{
    delete_account, forgot_password, login, register, reset_password, verify_reset_code,
};
use crate::backend::middleware::auth::auth_middleware;
use crate::backend::ratings::handlers as ratings;
use crate::backend::recipes::handlers as recipes;
use crate::backend::server::state::AppState;
use crate::backend::tags::get_tags;
use crate::backend::users::handlers as users;

/// Routes reachable without a token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/verify-reset-code", post(verify_reset_code))
        .route("/auth/reset-password", post(reset_password))
        .route("/tags", get(get_tags))
}

/// Routes behind the bearer-token middleware.
pub fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/delete-account", post(delete_account))
        // Recipes
        .route("/recipes/feed", get(recipes::feed))
        .route("/recipes/my-recipes", get(recipes::my_recipes))
        .route("/recipes/liked", get(recipes::liked_recipes))
        .route("/recipes/search", get(recipes::search_recipes))
        .route("/recipes/user/{user_id}", get(recipes::user_recipes))
        .route("/recipes", post(recipes::create_recipe))
        .route(
            "/recipes/{id}",
            get(recipes::get_recipe)
                .put(recipes::update_recipe)
                .delete(recipes::delete_recipe),
        )
        .route("/recipes/{id}/like", post(recipes::toggle_like))
        // Ratings
        .route("/recipes/{id}/avaliar", post(ratings::rate_recipe))
        .route("/recipes/{id}/avaliacoes", get(ratings::list_recipe_ratings))
        .route(
            "/recipes/{id}/avaliacoes/{rating_id}",
            delete(ratings::delete_rating),
        )
        .route(
            "/recipes/rating/{rating_id}/responder",
            post(ratings::reply_to_rating),
        )
        .route(
            "/recipes/rating/{rating_id}/react",
            post(ratings::react_to_rating),
        )
        .route("/recipes/rating/reply/{id}", delete(ratings::delete_reply))
        // Profiles and follows
        .route(
            "/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route(
            "/users/profile-picture",
            delete(users::delete_profile_picture),
        )
        .route(
            "/users/follow",
            post(users::follow_user).delete(users::unfollow_user),
        )
        .route("/users/{id}", get(users::get_user))
        .route("/users/{id}/is-following", get(users::is_following))
        .route("/users/{id}/followers", get(users::follower_count))
        .route("/users/{id}/following", get(users::following_count))
        .route("/users/{id}/followers-list", get(users::followers_list))
        .route("/users/{id}/following-list", get(users::following_list))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
