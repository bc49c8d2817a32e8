use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/register", get(handlers::register_page).post(handlers::register))
        .route("/logout", post(handlers::logout))
        .route("/api/articles", get(handlers::get_articles))
        .route("/api/clients", get(handlers::get_clients))
        .route("/api/entries", get(handlers::get_entries).post(handlers::create_entries))
        .route("/api/exits", get(handlers::get_exits).post(handlers::create_exits))
        .route("/api/chart", get(handlers::get_chart))
        .with_state(state)
}
