//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete.

/// Autocomplete handlers for spreadsheets, categories, goals and form options
pub mod autocomplete;
