//! REST API server for the skills resource.
//!
//! Serves `/api/v1/skills` over hyper, routes with matchit, and hands
//! every operation to the skills runtime through a request queue.

pub mod config;
pub mod handlers;
pub mod router;
pub mod server;

pub use config::ApiConfig;
pub use router::{AppState, Router, RouterError};
pub use server::{Accept, Server};
