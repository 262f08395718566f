//! Read-only HTTP status API
//!
//! - GET /sessions - All active voice sessions
//! - GET /sessions/:guild_id - One guild's session
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
