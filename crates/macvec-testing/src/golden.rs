//! Golden artifact testing
//!
//! Compares freshly written hex artifacts against checked-in copies. When the
//! contents differ the test fails, naming each mismatched line and the first
//! hex token on it that differs.
//!
//! # Usage
//!
//! ```rust,no_run
//! use macvec_testing::golden::GoldenTest;
//!
//! let golden = GoldenTest::new("directed_little");
//! golden.assert_eq("ref.hex", "C0 40\n");
//! ```
//!
//! # Updating Golden Files
//!
//! When an output change is intentional (and the harness has been updated
//! to match), rewrite the golden files with:
//! ```bash
//! MACVEC_UPDATE_GOLDEN=1 cargo test
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const UPDATE_ENV: &str = "MACVEC_UPDATE_GOLDEN";

/// A golden file test case
///
/// Golden files live in `{workspace}/tests/golden/{name}.{extension}`.
pub struct GoldenTest {
    name: String,
    golden_dir: PathBuf,
    update_mode: bool,
}

impl GoldenTest {
    /// Create a golden test rooted at the workspace's `tests/golden`
    pub fn new(name: &str) -> Self {
        let workspace_root = env::var("CARGO_WORKSPACE_DIR").unwrap_or_else(|_| {
            let manifest_dir =
                env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR should be set");
            find_workspace_root(Path::new(&manifest_dir))
                .unwrap_or_else(|| panic!("Could not find workspace root (started from {})", manifest_dir))
                .to_string_lossy()
                .to_string()
        });

        Self::with_golden_dir(name, PathBuf::from(workspace_root).join("tests").join("golden"))
    }

    /// Create a golden test with a custom golden directory
    pub fn with_golden_dir(name: &str, golden_dir: impl Into<PathBuf>) -> Self {
        let update_mode = env::var(UPDATE_ENV)
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        Self {
            name: name.to_string(),
            golden_dir: golden_dir.into(),
            update_mode,
        }
    }

    /// Assert that `actual` matches `{name}.{extension}`
    ///
    /// # Panics
    ///
    /// Panics if the contents differ (normal mode) or the golden file cannot
    /// be written (update mode).
    pub fn assert_eq(&self, extension: &str, actual: &str) {
        let golden_path = self.golden_path(extension);

        if self.update_mode {
            self.update_golden(&golden_path, actual);
        } else {
            self.compare_golden(&golden_path, actual);
        }
    }

    /// Read an artifact from disk and compare it
    pub fn assert_artifact(&self, extension: &str, artifact: &Path) {
        let actual = fs::read_to_string(artifact)
            .unwrap_or_else(|e| panic!("Failed to read artifact {:?}: {}", artifact, e));
        self.assert_eq(extension, &actual);
    }

    fn golden_path(&self, extension: &str) -> PathBuf {
        self.golden_dir.join(format!("{}.{}", self.name, extension))
    }

    fn update_golden(&self, path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create golden directory {:?}: {}", parent, e)
            });
        }

        fs::write(path, content)
            .unwrap_or_else(|e| panic!("Failed to write golden file {:?}: {}", path, e));
    }

    fn compare_golden(&self, path: &Path, actual: &str) {
        let expected = fs::read_to_string(path).unwrap_or_else(|e| {
            panic!(
                "Failed to read golden file {:?}: {}\n\
                 \n\
                 Hint: If this is a new test, run with {}=1 to create the golden file.",
                path, e, UPDATE_ENV
            )
        });

        if expected != actual {
            let diff = describe_mismatch(&expected, actual);
            panic!(
                "Golden file mismatch for test '{}'\n\
                 Golden file: {}\n\
                 \n\
                 {}\n\
                 \n\
                 To update the golden file if this change is intentional:\n\
                 {}=1 cargo test {}",
                self.name,
                path.display(),
                diff,
                UPDATE_ENV,
                self.name
            );
        }
    }
}

/// Walk up from `start` to the first directory whose Cargo.toml has `[workspace]`
fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        let contents = fs::read_to_string(dir.join("Cargo.toml")).ok()?;
        contents.contains("[workspace]").then(|| dir.to_path_buf())
    })
}

const MAX_REPORTED: usize = 8;

/// Describe where two hex artifacts diverge, down to the first differing token
fn describe_mismatch(expected: &str, actual: &str) -> String {
    let expected: Vec<&str> = expected.lines().collect();
    let actual: Vec<&str> = actual.lines().collect();

    let mut report = String::new();
    let mut mismatched = 0;
    for line in 0..expected.len().max(actual.len()) {
        let (want, got) = (expected.get(line), actual.get(line));
        if want == got {
            continue;
        }
        mismatched += 1;
        if mismatched > MAX_REPORTED {
            continue;
        }
        let detail = match (want.copied(), got.copied()) {
            (Some(want), Some(got)) => {
                let tokens = |line: &str| line.split_whitespace().count();
                let token = want
                    .split_whitespace()
                    .zip(got.split_whitespace())
                    .position(|(w, g)| w != g)
                    .unwrap_or_else(|| tokens(want).min(tokens(got)));
                format!("token {}: expected `{}`, got `{}`", token + 1, want, got)
            }
            (Some(want), None) => format!("missing, expected `{}`", want),
            (None, Some(got)) => format!("unexpected `{}`", got),
            (None, None) => continue,
        };
        report.push_str(&format!("  line {}, {}\n", line + 1, detail));
    }

    if mismatched > MAX_REPORTED {
        report.push_str(&format!("  ... {} more\n", mismatched - MAX_REPORTED));
    }
    report.push_str(&format!(
        "{} mismatched lines (expected {} lines, got {})\n",
        mismatched,
        expected.len(),
        actual.len()
    ));
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_golden_path_generation() {
        let test = GoldenTest::with_golden_dir("directed", "/golden");
        assert_eq!(test.golden_path("ref.hex"), PathBuf::from("/golden/directed.ref.hex"));
    }

    #[test]
    fn test_workspace_root_is_found() {
        let root = find_workspace_root(Path::new(env!("CARGO_MANIFEST_DIR"))).unwrap();
        assert!(root.join("crates").is_dir());
    }

    #[test]
    fn test_matching_content_passes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("case.hex"), "40\nB8\n").unwrap();

        let test = GoldenTest {
            name: "case".to_string(),
            golden_dir: dir.path().to_path_buf(),
            update_mode: false,
        };
        test.assert_eq("hex", "40\nB8\n");
    }

    #[test]
    #[should_panic(expected = "Golden file mismatch")]
    fn test_mismatch_panics() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("case.hex"), "C0 40\n").unwrap();

        let test = GoldenTest {
            name: "case".to_string(),
            golden_dir: dir.path().to_path_buf(),
            update_mode: false,
        };
        test.assert_eq("hex", "40 C0\n");
    }

    #[test]
    fn test_mismatch_points_at_token() {
        let report = describe_mismatch("40 B8\n30 00\n", "40 B8\n30 01\n3C 00\n");
        assert!(report.contains("line 2, token 2: expected `30 00`, got `30 01`"));
        assert!(report.contains("line 3, unexpected `3C 00`"));
        assert!(report.contains("2 mismatched lines (expected 2 lines, got 3)"));
        assert!(!report.contains("line 1"));
    }

    #[test]
    fn test_mismatch_caps_reported_lines() {
        let expected = "00\n".repeat(12);
        let actual = "FF\n".repeat(12);
        let report = describe_mismatch(&expected, &actual);
        assert!(report.contains("line 8, token 1"));
        assert!(!report.contains("line 9,"));
        assert!(report.contains("... 4 more"));
    }
}
