//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod locations;
mod posts;
mod profile;
mod users;
mod views;


use actix_web::web;

#[cfg(feature = "rate-limit")]
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::middleware::error::AppError;
use crate::state::AppState;

/// Register shared state, extractor settings and every route.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.clone()))
        .app_data(web::Data::new(state.tokens.clone()))
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        // An id that does not parse cannot name an existing row.
        .app_data(web::PathConfig::default().error_handler(|_err, _req| {
            AppError::NotFound("Resource not found".to_string()).into()
        }));

    let auth_routes = web::scope("/auth")
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/me", web::get().to(auth::me));
    #[cfg(feature = "rate-limit")]
    let auth_routes = auth_routes.wrap(RateLimitMiddleware::new(state.rate_limiter.clone()));

    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(auth_routes)
            .service(
                web::scope("/profile")
                    .route("", web::put().to(profile::update))
                    .route("/password", web::post().to(profile::change_password)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::feed))
                    .route("", web::post().to(posts::create))
                    .route("/{id}", web::get().to(posts::detail))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::delete))
                    .route("/{id}/comments", web::post().to(comments::create))
                    .route(
                        "/{id}/comments/{comment_id}",
                        web::put().to(comments::update),
                    )
                    .route(
                        "/{id}/comments/{comment_id}",
                        web::delete().to(comments::delete),
                    ),
            )
            .service(
                web::scope("/categories")
                    .route("", web::post().to(categories::create))
                    .route("/{slug}", web::get().to(categories::show)),
            )
            .service(
                web::scope("/locations")
                    .route("", web::get().to(locations::list))
                    .route("", web::post().to(locations::create)),
            )
            .route("/users/{username}", web::get().to(users::profile)),
    );
}
