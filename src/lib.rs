pub mod ai_structs;
pub mod classifier;
pub mod config;
pub mod console;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod move_log;
pub mod organizer;
pub mod planner;
pub mod providers;
pub mod rules;
pub mod utils;

pub use error::{OrganizerError, Result};
