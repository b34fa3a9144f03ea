//! Configuration: the application file and the backing-store connection.

pub mod app;
pub mod store;
