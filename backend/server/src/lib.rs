//! Backend of a perk sharing platform.
//!
//! Users share perks (discounts and offers tied to programs like CAA or Scene+), vote them up or
//! down, and keep track of which membership types they hold.
//!
//!
//!
//! # General Infrastructure
//! - One axum server, JSON over HTTP
//! - Redis holds every record plus the vote ledger
//! - Sessions are identified by a `session_id` cookie, nothing else is needed to vote
//!
//!
//!
//! # Voting
//!
//! **Goal**: One vote per session per perk, and clicking the same arrow again takes it back.
//!
//! - The session vote tracker remembers the last vote per perk
//! - [`catalog::votes::apply_vote`] turns (last vote, requested vote) into a score delta
//! - The ledger applies the delta atomically; concurrent sessions never lose each other's votes
//! - Votes on perks that do not exist are dropped, the client gets `204 No Content`
//!
//!
//!
//! # Notes
//!
//! ## Sessions
//! Vote state is deliberately ephemeral. It expires with the session (sliding TTL in Redis) or
//! when the client ends the session. The score itself never resets.
//!
//! ## Search
//! Filtering and sorting happen in process over the full perk list. The list is small enough
//! that a search engine would only add another moving part.
//!
//!
//!
//! # Setup
//!
//! Run against a local Redis.
//! ```sh
//! REDIS_URL=redis://127.0.0.1:6379 SEED_ON_START=true RUST_LOG=info cargo run --bin perks
//! ```
//!
//! Pre-load membership types and the demo perks without starting the server.
//! ```sh
//! cargo run --bin seed
//! ```
//!
//! Hammer a running server with concurrent votes.
//! ```sh
//! cargo run --bin tester -- --perk 1 --sessions 200
//! ```
use std::sync::Arc;

use axum::{
    Router,
    http::{
        Method,
        header::{CONTENT_TYPE, COOKIE},
    },
    routing::{delete, get, post},
};

use chrono::Local;
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod database;
pub mod error;
pub mod ledger;
pub mod members;
pub mod perks;
pub mod repository;
pub mod routes;
pub mod search;
pub mod seed;
pub mod session;
pub mod state;
pub mod votes;

use routes::{
    assign_membership_handler, available_memberships_handler, create_membership_handler,
    create_perk_handler, delete_perk_handler, downvote_handler, end_session_handler,
    health_handler, memberships_handler, perk_handler, register_handler,
    remove_membership_handler, search_handler, session_votes_handler, upvote_handler,
    user_handler, vote_handler,
};
use state::State;

pub fn app(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, COOKIE])
        .max_age(state.config.cors_max_age);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/perks", get(search_handler).post(create_perk_handler))
        .route("/api/perks/{id}", get(perk_handler).delete(delete_perk_handler))
        .route("/api/perks/{id}/upvote", post(upvote_handler))
        .route("/api/perks/{id}/downvote", post(downvote_handler))
        .route("/api/perks/{id}/vote", post(vote_handler))
        .route(
            "/api/memberships",
            get(memberships_handler).post(create_membership_handler),
        )
        .route("/api/users/register", post(register_handler))
        .route("/api/users/{id}", get(user_handler))
        .route("/api/users/{id}/memberships", post(assign_membership_handler))
        .route(
            "/api/users/{id}/memberships/available",
            get(available_memberships_handler),
        )
        .route(
            "/api/users/{id}/memberships/{membership_type_id}",
            delete(remove_membership_handler),
        )
        .route("/api/session/votes", get(session_votes_handler))
        .route("/api/session/end", post(end_session_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new().await.expect("Redis misconfigured!");

    if state.config.seed_on_start {
        let report = seed::load_defaults(&state, Local::now().date_naive())
            .await
            .expect("Failed to seed defaults");
        info!("Seeded {report:?}");
    }

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = app(state);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address)
        .await
        .expect("Failed to bind address");
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    info!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
