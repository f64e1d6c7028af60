pub mod auth;
pub mod config;
pub mod handlers;
mod router;
mod state;

pub use auth::AuthContext;
pub use config::{Environment, Settings};
pub use router::create_router;
pub use state::AppState;
