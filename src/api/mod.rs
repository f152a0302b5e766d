//! # API Module
//!
//! HTTP endpoints served by `promptlist serve`.
//!
//! ## Endpoints
//!
//! - [`generate_playlist`] - `POST /generate-playlist`. Takes
//!   `{"prompt": "...", "accessToken": "..."}`, runs the playlist pipeline and
//!   answers with `{success, playlist, tracksFound, totalSuggested, failures}` plus
//!   the optional `suggestionError` and `hydrationError` advisories.
//!   Missing inputs give 400, a rejected token 401 and any other fatal error 500,
//!   each with an `{"error": "..."}` body.
//! - [`health`] - `GET /health`, returns status and version.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::{get, post}};
//! use promptlist::api::{generate_playlist, health};
//!
//! let app = Router::new()
//!     .route("/generate-playlist", post(generate_playlist))
//!     .route("/health", get(health))
//!     .with_state(state);
//! ```

mod generate;
mod health;

pub use generate::generate_playlist;
pub use health::health;
