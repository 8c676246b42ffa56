//! Key/value outputs published back to the pipeline.

use anyhow::{Context, Result};
use std::env;
use std::fs::OpenOptions;
use std::io::Write;

/// Appends `key=value` to the pipeline output file when `GITHUB_OUTPUT` is
/// set; falls back to stdout so local runs stay inspectable.
pub fn set_output(key: &str, value: &str) -> Result<()> {
    if let Ok(path) = env::var("GITHUB_OUTPUT") {
        if !path.is_empty() {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("open {path}"))?;
            writeln!(file, "{key}={value}").with_context(|| format!("append {path}"))?;
            return Ok(());
        }
    }
    println!("{key}={value}");
    Ok(())
}
