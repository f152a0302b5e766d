//! Prompt-to-playlist library.
//!
//! This library turns a free-text mood or theme into a populated Spotify playlist.
//! A language model proposes a title and a ranked list of songs, every song is
//! resolved against the Spotify catalog one at a time, and each hit is appended to
//! a freshly created playlist as soon as it is found. The run ends with a
//! [`types::ResolutionReport`] telling the caller how many suggestions made it.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Error types for the catalog, suggestion and pipeline layers
//! - `management` - Cached credential handling
//! - `pipeline` - Normalize, resolve, assemble and report
//! - `server` - Axum router and listener
//! - `spotify` - Spotify Web API client implementation
//! - `suggest` - Language model client for titles and song suggestions
//! - `types` - Data structures and type definitions
//!
//! # Example
//!
//! ```
//! use promptlist::{config, pipeline, spotify::SpotifyClient, suggest::OpenAiClient};
//!
//! #[tokio::main]
//! async fn main() -> promptlist::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     let catalog = SpotifyClient::new(&config.catalog, "BQC...")?;
//!     let suggestions = OpenAiClient::new(&config.suggestions)?;
//!     let request = pipeline::GenerateRequest::new("rainy sunday coffee", "BQC...");
//!     let report = pipeline::generate_playlist(&request, &catalog, &suggestions, &config.pipeline, &()).await?;
//!     println!("{}/{}", report.tracks_found, report.total_suggested);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod pipeline;
pub mod server;
pub mod spotify;
pub mod suggest;
pub mod types;

/// A convenient Result type alias for operations that may fail.
///
/// Used at the binary edge where errors from different layers meet. Library
/// code returns the typed errors from [`error`] instead.
///
/// # Example
///
/// ```
/// use promptlist::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// info!("Creating playlist...");
/// info!("Found {} of {} songs", found, total);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// Creates a formatted output line with a green "✓" indicator to signify
/// successful completion of operations. Used to provide positive feedback
/// when operations complete successfully.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// success!("Playlist created");
/// success!("Added {} tracks", count);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Used for unrecoverable errors
/// that require immediate program termination.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Behavior
///
/// This macro will cause the program to exit immediately after printing
/// the error message. It should only be used for fatal errors where
/// recovery is not possible.
///
/// # Example
///
/// ```
/// error!("Failed to load configuration");
/// error!("Missing access token: {}", hint);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Creates a formatted output line with a yellow "!" indicator to highlight
/// potential issues or important notices that don't require program termination.
/// Used for recoverable issues or important information that users should notice.
///
/// # Arguments
///
/// The macro accepts the same arguments as `println!`, supporting format
/// strings and interpolation.
///
/// # Example
///
/// ```
/// warning!("Cached token looks expired");
/// warning!("{} suggestions could not be resolved", missed);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
