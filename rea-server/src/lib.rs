//! # REA Server
//!
//! axum front end for the registered email address service. Owns
//! configuration, session middleware, routing and template rendering; the
//! page logic itself lives in `rea-core`.

pub mod handlers;
pub mod infra;
pub mod render;
pub mod routes;

pub use infra::app_state::AppState;
pub use infra::config::Config;
pub use routes::create_router;
