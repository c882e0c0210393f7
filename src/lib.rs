pub mod cli;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod gallery;
pub mod logging;
pub mod models;
pub mod preferences;
pub mod scene;
pub mod state;

pub use cli::run_cli;
