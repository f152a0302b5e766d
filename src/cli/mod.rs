//! # CLI Module
//!
//! User-facing commands of promptlist. Each command loads the configuration,
//! builds the clients it needs and reports through the crate's output macros.
//! Fatal problems end the process via `error!`.
//!
//! ## Commands
//!
//! - [`generate`] - Runs the playlist pipeline once for a prompt and prints a
//!   summary, or the JSON response body with `--json`
//! - [`serve`] - Starts the HTTP server exposing `POST /generate-playlist`
//!
//! ## Usage Patterns
//!
//! ```bash
//! promptlist generate --prompt "rainy sunday, coffee, old records"
//! promptlist generate --prompt "gym" --match require-artist --duplicates skip
//! promptlist serve
//! ```
//!
//! ## Credentials
//!
//! The bearer token for Spotify is never obtained here. `generate` reads it from
//! `--token`, `SPOTIFY_ACCESS_TOKEN` or the cached token file; the server receives
//! it with every request.

mod generate;
mod serve;

pub use generate::PipelineFlags;
pub use generate::generate;
pub use serve::serve;
