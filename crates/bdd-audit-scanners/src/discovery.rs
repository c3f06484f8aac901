//! Recursive source discovery shared by the scanners.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::ScanError;

/// Collect every file under `root` with the given extension, sorted by
/// path. The extension comparison ignores ASCII case.
///
/// Symlink loops are skipped; other traversal failures abort the walk.
pub(crate) fn collect_sources(
    root: &Path,
    extension: &'static str,
) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootMissing(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for next in WalkDir::new(root).follow_links(false) {
        match next {
            Ok(entry) => {
                if let Some(path) = source_path(entry, extension) {
                    files.push(path);
                }
            }
            Err(error) => {
                if let Some(error) = into_io_error(error) {
                    return Err(ScanError::Io(error));
                }
            }
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(ScanError::NoSources {
            root: root.to_path_buf(),
            extension,
        });
    }
    Ok(files)
}

fn source_path(entry: DirEntry, extension: &str) -> Option<PathBuf> {
    if !entry.file_type().is_file() {
        return None;
    }
    let path = entry.into_path();
    let matches = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
    matches.then_some(path)
}

fn into_io_error(error: walkdir::Error) -> Option<std::io::Error> {
    if error.loop_ancestor().is_some() {
        return None;
    }
    let rendered = error.to_string();
    Some(
        error
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other(rendered)),
    )
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "tests fail loudly when the fixture cannot be built"
)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn collects_matching_files_sorted() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("b.feature"), "").expect("write file");
        fs::write(dir.path().join("a.feature"), "").expect("write file");
        fs::write(dir.path().join("notes.txt"), "").expect("write file");
        fs::create_dir(dir.path().join("sub")).expect("create dir");
        fs::write(dir.path().join("sub/c.FEATURE"), "").expect("write file");

        let files = collect_sources(dir.path(), "feature").expect("collects");
        let names: Vec<_> = files
            .iter()
            .filter_map(|path| path.strip_prefix(dir.path()).ok())
            .map(|path| path.to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.feature", "b.feature", "sub/c.FEATURE"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let gone = dir.path().join("nowhere");
        assert!(matches!(
            collect_sources(&gone, "feature"),
            Err(ScanError::RootMissing(_))
        ));
    }

    #[test]
    fn root_without_sources_is_an_error() {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::write(dir.path().join("notes.txt"), "").expect("write file");
        assert!(matches!(
            collect_sources(dir.path(), "feature"),
            Err(ScanError::NoSources { extension: "feature", .. })
        ));
    }
}
