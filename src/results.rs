//! Precondition check on the raw results directory.

use std::fs;
use std::path::Path;

const RESULT_EXTENSIONS: [&str; 2] = [".json", ".xml"];

/// Returns true when `results_dir` exists and holds at least one top-level
/// file the renderer recognizes as a result (`.json` or `.xml`, case
/// insensitive). Failures are logged, not raised; the caller treats a false
/// return as fatal for the run.
pub fn results_ok(results_dir: &Path) -> bool {
    let entries = match fs::read_dir(results_dir) {
        Ok(entries) => entries,
        Err(_) => {
            tracing::warn!(
                "results directory doesn't exist: {}",
                results_dir.display()
            );
            return false;
        }
    };
    let found = entries.filter_map(Result::ok).any(|entry| {
        entry.path().is_file() && is_result_file(&entry.file_name().to_string_lossy())
    });
    if !found {
        tracing::warn!(
            "results directory has no json or xml files: {}",
            results_dir.display()
        );
    }
    found
}

fn is_result_file(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    RESULT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn accepts_directory_with_json_result() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("result1.json"), "{}").expect("write");
        assert!(results_ok(dir.path()));
    }

    #[test]
    fn accepts_uppercase_xml_extension() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("SUITE.XML"), "<xml/>").expect("write");
        assert!(results_ok(dir.path()));
    }

    #[test]
    fn rejects_directory_without_recognized_files() {
        let dir = TempDir::new().expect("tempdir");
        fs::write(dir.path().join("run.log"), "noise").expect("write");
        assert!(!results_ok(dir.path()));
    }

    #[test]
    fn ignores_result_files_in_subdirectories() {
        let dir = TempDir::new().expect("tempdir");
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).expect("mkdir");
        fs::write(nested.join("result1.json"), "{}").expect("write");
        assert!(!results_ok(dir.path()));
    }

    #[test]
    fn rejects_missing_directory() {
        let dir = TempDir::new().expect("tempdir");
        assert!(!results_ok(&dir.path().join("absent")));
    }
}
