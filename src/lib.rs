//! Dev-stack tray launcher library
//!
//! Starts the local backend and frontend dev servers, keeps their liveness
//! reflected in a system tray menu, and tears both down on Exit.

pub mod browser;
pub mod config;
pub mod error;
pub mod logging;
pub mod poller;
pub mod supervisor;
pub mod tray;

pub use error::{AppError, Result};
