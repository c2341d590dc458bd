pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod rooms;
pub mod routes;
pub mod state;

pub use app::{build_router, ApiDoc};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use rooms::RoomHub;
pub use state::AppState;
