//! Build script for promptlist.
//!
//! Copies the `.env.example` configuration template into the user's local data
//! directory so that `promptlist/.env` can be created next to it.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to the local data directory.
///
/// The destination is the platform-specific local data directory:
/// - Linux: `~/.local/share/promptlist/.env.example`
/// - macOS: `~/Library/Application Support/promptlist/.env.example`
/// - Windows: `%LOCALAPPDATA%/promptlist/.env.example`
///
/// A missing template or an unwritable destination only produces a cargo warning.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Re-run if the template changes
    println!("cargo:rerun-if-changed=.env.example");

    // Where to copy FROM (crate root)
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    // Compute target dir (your local data dir)
    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("promptlist");

    // Only copy if the source exists; otherwise warn instead of failing
    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    // A read-only data directory must not break the build
    let copied = fs::create_dir_all(&out_dir)
        .and_then(|_| fs::copy(&env_example_path, out_dir.join(".env.example")));
    if let Err(e) = copied {
        println!(
            "cargo:warning=cannot copy .env.example to {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
