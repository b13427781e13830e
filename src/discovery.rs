//! Locates captured-output artifacts on disk.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Recursively collects `.out` artifacts under the given root.
///
/// The list is sorted so a corpus run visits units in a deterministic order.
/// Sibling `.err` files are not collected here; each `Duet` picks its own up
/// by suffix substitution.
pub fn discover_artifacts<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .map(|ext| ext == "out")
                    .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_only_out_files_and_sorts_them() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("B.out"), "").unwrap();
        fs::write(dir.path().join("A.out"), "").unwrap();
        fs::write(dir.path().join("A.err"), "").unwrap();
        fs::write(dir.path().join("A.java"), "").unwrap();

        let found = discover_artifacts(dir.path());
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["A.out", "B.out"]);
    }
}
