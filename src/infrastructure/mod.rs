//! Infrastructure layer providing external service integrations.
//!
//! This module contains spreadsheet loading (file and HTTP), the background
//! load task, command-line configuration and log setup.

pub mod config;
pub mod loader;
pub mod logging;
pub mod task;

pub use config::*;
pub use loader::*;
pub use logging::*;
pub use task::*;
