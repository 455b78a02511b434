//! Presentation layer handling terminal UI and user input.
//!
//! This module draws the dashboard with ratatui (header, filter selects and
//! the National/International bar chart) and maps key presses to selections.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
