//! Copies `.env.example` into the moodlist data directory so a fresh install
//! has a configuration template next to where `.env` is read from.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let template = manifest_dir.join(".env.example");

    let mut data_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    data_dir.push("moodlist");

    if !template.is_file() {
        println!("cargo:warning=.env.example not found at {}", template.display());
        return Ok(());
    }

    // read-only home directories (sandboxed builds) must not fail the build
    if let Err(e) = fs::create_dir_all(&data_dir)
        .and_then(|_| fs::copy(&template, data_dir.join(".env.example")).map(|_| ()))
    {
        println!(
            "cargo:warning=could not copy .env.example to {}: {}",
            data_dir.display(),
            e
        );
    }

    Ok(())
}
