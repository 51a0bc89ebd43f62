//! Comment handlers, nested under a post.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blogicum_core::policy::Outcome;
use blogicum_shared::dto::CommentRequest;

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{id}/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let view = state
        .content
        .add_comment(
            identity.user_id,
            path.into_inner(),
            body.into_inner().text,
            Utc::now(),
        )
        .await?;

    Ok(HttpResponse::Created().json(views::comment(view)))
}

/// PUT /api/posts/{id}/comments/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let outcome = state
        .content
        .edit_comment(identity.user_id, post_id, comment_id, body.into_inner().text)
        .await?;

    match outcome {
        Outcome::Done(view) => Ok(HttpResponse::Ok().json(views::comment(view))),
        Outcome::Redirect(redirect) => Ok(views::see_other(redirect)),
    }
}

/// DELETE /api/posts/{id}/comments/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    match state
        .content
        .delete_comment(identity.user_id, post_id, comment_id)
        .await?
    {
        Outcome::Done(()) => Ok(HttpResponse::NoContent().finish()),
        Outcome::Redirect(redirect) => Ok(views::see_other(redirect)),
    }
}
