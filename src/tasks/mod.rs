//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod input_watcher;

// Re-export main functions
pub use input_watcher::input_watcher_task;
