//! Public profile pages.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::pagination::PageRequest;
use blogicum_shared::dto::{PageQuery, ProfilePostsResponse};

use super::views;
use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/users/{username}?page=
///
/// The owner sees every post they wrote, others only the public ones.
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::from_query(query.page.as_deref(), state.posts_per_page);
    let (user, posts) = state
        .content
        .profile_posts(&username, viewer.user_id(), page, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(ProfilePostsResponse {
        profile: views::profile(&user),
        posts: views::page(posts, views::post),
    }))
}
