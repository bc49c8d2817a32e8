pub mod app;
pub mod chart;
pub mod client;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod listing;
pub mod models;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use chart::{ChartData, ChartInput, ChartQuery, build_chart};
pub use client::{ApiClient, ApiError, Snapshot};
pub use config::Config;
pub use session::Session;
pub use state::AppState;
pub use storage::load_session;
