//! Server-side components of the `zrank` leaderboard service.
//!
//! ## Submodules
//!
//! - [`config`] - CLI / environment configuration and its validation.
//! - [`handler`] - HTTP routes over a single leaderboard.
//! - [`error`] - Mapping of leaderboard errors to HTTP responses.
//! - [`telemetry`] - Console logging initialization.

pub mod config;
pub mod error;
pub mod handler;
pub mod telemetry;
