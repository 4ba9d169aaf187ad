//! REST backend for relief supplies, gratitude entries and testimonials.
//!
//! User registration/login with Argon2 password hashes and JWT session
//! tokens, plus CRUD over three document collections stored in PostgreSQL.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;

pub use config::Config;
pub use error::AppError;
pub use handlers::http::AppState;

use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the API router (auth, supplies, gratitude, testimonial, status). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    let auth_routes = axum::Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    axum::Router::new()
        .route("/", get(handlers::status))
        .nest("/api/auth", auth_routes)
        .route(
            "/supplies",
            get(handlers::list_supplies).post(handlers::create_supply),
        )
        .route(
            "/supplies/:id",
            get(handlers::get_supply)
                .put(handlers::update_supply)
                .delete(handlers::delete_supply),
        )
        .route("/create-gratitude", post(handlers::create_gratitude))
        .route("/gratitudes", get(handlers::list_gratitudes))
        .route("/create-testimonial", post(handlers::create_testimonial))
        .route("/testimonial", get(handlers::list_testimonials))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
