//! User Dashboard Library
//!
//! Loads a spreadsheet of user records, classifies them by email domain and
//! country, and charts National vs International counts in the terminal.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
