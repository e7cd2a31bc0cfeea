//! CLAP audio software catalog kernel.
//!
//! This library exposes the kernel for the `clapdb` binary and for
//! integration testing.

pub mod config;
pub mod db;
pub mod error;
pub mod feed;
pub mod models;
pub mod routes;
pub mod search;
pub mod state;
pub mod store;
pub mod theme;

pub use config::{Config, SiteSettings};
pub use error::{AppError, AppResult};
pub use state::AppState;
