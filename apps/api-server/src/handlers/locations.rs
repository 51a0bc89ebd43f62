//! Locations.

use actix_web::{HttpResponse, web};

use blogicum_shared::dto::{LocationRequest, LocationResponse};

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/locations
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let locations: Vec<LocationResponse> = state
        .content
        .published_locations()
        .await?
        .iter()
        .map(views::location)
        .collect();

    Ok(HttpResponse::Ok().json(locations))
}

/// POST /api/locations - staff only
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let location = state
        .content
        .create_location(identity.user_id, req.name, req.is_published)
        .await?;

    Ok(HttpResponse::Created().json(views::location(&location)))
}
