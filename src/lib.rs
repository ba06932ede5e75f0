pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod tracker;
pub mod utils;

pub use error::{AppError, AppResult};
pub use tracker::ProgressTracker;
