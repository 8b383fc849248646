//! tabpredict Server
//!
//! HTTP/JSON front end for a single pre-fitted binary classifier.
//!
//! The schema and classifier are loaded once into a [`PredictionContext`];
//! each `/predict` call runs validation, coercion, inference and response
//! assembly against that read-only context.

pub mod cli;
pub mod config;
pub mod predict;
pub mod routes;
pub mod state;
pub mod telemetry;
pub mod ui;

pub use cli::Cli;
pub use config::ServerConfig;
pub use predict::{run_pipeline, PredictError};
pub use routes::create_router;
pub use state::{AppState, PredictionContext};
