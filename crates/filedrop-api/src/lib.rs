//! Filedrop HTTP surface
//!
//! Axum router, handlers, and server lifecycle around the intake and
//! retention services.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod multipart;
pub mod setup;
pub mod state;
