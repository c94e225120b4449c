//! HTTP API Layer
//!
//! Liveness check on `GET /` and authenticated job intake on `POST /jobs/`.

pub mod auth;
pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{router, AppState, HttpServer, HttpServerConfig, RunningServer};
