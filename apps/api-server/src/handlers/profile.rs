//! Handlers for the current user's own profile.

use actix_web::{HttpResponse, web};

use blogicum_core::service::ProfileUpdate;
use blogicum_shared::dto::{ChangePasswordRequest, UpdateProfileRequest};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// PUT /api/profile
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .accounts
        .update_profile(
            identity.user_id,
            ProfileUpdate {
                username: req.username,
                email: req.email,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(views::user(&user)))
}

/// POST /api/profile/password
pub async fn change_password(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<ChangePasswordRequest>,
) -> AppResult<HttpResponse> {
    state
        .accounts
        .change_password(identity.user_id, &body.current_password, &body.new_password)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
