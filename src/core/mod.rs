//! Core business logic.
//!
//! Framework-agnostic: normalization, upserts, aggregation and export work on
//! `store` types and plain data, and the bot layer only formats the results.

pub mod aggregate;
pub mod dashboard;
pub mod expense;
pub mod export;
pub mod input;
pub mod models;
pub mod normalize;
pub mod report;
pub mod upsert;
