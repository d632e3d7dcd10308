//! Utility functions for display formatting.

pub mod format;

pub use format::{format_date, format_distance, format_number, truncate_string};
