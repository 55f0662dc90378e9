//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Post routes
            .service(
                web::scope("/posts")
                    .route("/save-draft", web::post().to(posts::save_draft))
                    .route("/publish", web::post().to(posts::publish))
                    .route("", web::get().to(posts::list))
                    .route("/{id}", web::get().to(posts::get_by_id))
                    .route("/{id}", web::delete().to(posts::delete)),
            ),
    );
}
