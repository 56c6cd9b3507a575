//! Web front of the catalog: a JSON REST API and server-rendered admin pages
//! over [`catalog_core::CatalogApi`].

pub mod error;
pub mod handlers;
pub mod logging;
pub mod render;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, serve, start_server, AppState};
