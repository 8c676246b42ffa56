//! Invocation of the external report renderer.
//!
//! The renderer is spawned once per run with inherited stdio and awaited to
//! completion; its exit status is the sole success signal. No timeout is
//! imposed and no process handle escapes this module.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

pub fn generate(
    program: &str,
    extra_args: &[String],
    results_dir: &Path,
    output_dir: &Path,
) -> Result<()> {
    let program = resolve_program(program)?;
    tracing::info!(
        "rendering report: {} generate --clean {} -o {}",
        program.display(),
        results_dir.display(),
        output_dir.display()
    );
    let status = Command::new(&program)
        .arg("generate")
        .arg("--clean")
        .args(extra_args)
        .arg(results_dir)
        .arg("-o")
        .arg(output_dir)
        .status()
        .with_context(|| format!("spawn renderer {}", program.display()))?;
    if !status.success() {
        return Err(anyhow!("renderer exited with {status}"));
    }
    Ok(())
}

fn resolve_program(program: &str) -> Result<PathBuf> {
    if program.contains(std::path::MAIN_SEPARATOR) {
        return Ok(PathBuf::from(program));
    }
    which::which(program).with_context(|| format!("renderer {program} not found on PATH"))
}
