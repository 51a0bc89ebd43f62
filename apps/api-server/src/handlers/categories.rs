//! Category pages and staff-side category management.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::pagination::PageRequest;
use blogicum_core::service::NewCategory;
use blogicum_shared::dto::{CategoryPostsResponse, CategoryRequest, PageQuery};

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories/{slug}?page=
pub async fn show(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::from_query(query.page.as_deref(), state.posts_per_page);
    let (category, posts) = state
        .content
        .category_posts(&slug, viewer.user_id(), page, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPostsResponse {
        category: views::category(&category),
        posts: views::page(posts, views::post),
    }))
}

/// POST /api/categories - staff only
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let category = state
        .content
        .create_category(
            identity.user_id,
            NewCategory {
                title: req.title,
                description: req.description,
                slug: req.slug,
                is_published: req.is_published,
            },
        )
        .await?;

    tracing::info!(slug = %category.slug, by = %identity.username, "category created");
    Ok(HttpResponse::Created().json(views::category(&category)))
}
