// HTTP API

pub mod error;
pub mod models;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{router, ApiServer};
pub use state::AppState;
