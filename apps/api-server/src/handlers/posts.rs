//! Post handlers: the public feed, post pages, and authoring.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blogicum_core::domain::PostDraft;
use blogicum_core::pagination::PageRequest;
use blogicum_core::policy::Outcome;
use blogicum_shared::dto::{PageQuery, PostRequest};

use super::views;
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn draft(req: PostRequest) -> PostDraft {
    PostDraft {
        title: req.title,
        text: req.text,
        pub_date: req.pub_date,
        is_published: req.is_published,
        category_id: req.category_id,
        location_id: req.location_id,
        image: req.image,
    }
}

/// GET /api/posts?page=
pub async fn feed(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::from_query(query.page.as_deref(), state.posts_per_page);
    let posts = state
        .content
        .feed(viewer.user_id(), page, Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(views::page(posts, views::post)))
}

/// GET /api/posts/{id}
pub async fn detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = state
        .content
        .post_detail(path.into_inner(), viewer.user_id(), Utc::now())
        .await?;

    Ok(HttpResponse::Ok().json(views::post_detail(detail)))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .content
        .create_post(identity.user_id, draft(body.into_inner()))
        .await?;

    // The author can always see their own post.
    let detail = state
        .content
        .post_detail(post.id, Some(identity.user_id), Utc::now())
        .await?;
    Ok(HttpResponse::Created().json(views::post_detail(detail)))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let outcome = state
        .content
        .edit_post(identity.user_id, post_id, draft(body.into_inner()))
        .await?;

    match outcome {
        Outcome::Done(post) => {
            let detail = state
                .content
                .post_detail(post.id, Some(identity.user_id), Utc::now())
                .await?;
            Ok(HttpResponse::Ok().json(views::post_detail(detail)))
        }
        Outcome::Redirect(redirect) => Ok(views::see_other(redirect)),
    }
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    match state
        .content
        .delete_post(identity.user_id, path.into_inner())
        .await?
    {
        Outcome::Done(()) => Ok(HttpResponse::NoContent().finish()),
        Outcome::Redirect(redirect) => Ok(views::see_other(redirect)),
    }
}
