//! Build script for discogs2spotify.
//!
//! Copies the `.env.example` credentials template into the user's local data
//! directory so a fresh install has a template next to where the tool looks
//! for its `.env` file.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to the local data directory.
///
/// # Destination
///
/// - Linux: `~/.local/share/discogs2spotify/.env.example`
/// - macOS: `~/Library/Application Support/discogs2spotify/.env.example`
/// - Windows: `%LOCALAPPDATA%/discogs2spotify/.env.example`
///
/// A missing template only produces a cargo warning. Directory creation and
/// file write failures abort the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("discogs2spotify");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        fs::write(out_dir.join(".env.example"), contents)?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
