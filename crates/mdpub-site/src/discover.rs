//! Source file discovery.

use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

/// Find every file below `<root>/<content_dir>`.
///
/// Hidden files and directories are skipped. Paths are returned sorted so
/// runs are reproducible; filtering by format happens later. Returns an
/// empty Vec if the content directory doesn't exist.
#[must_use]
pub fn discover(root: &Path, content_dir: &Path) -> Vec<PathBuf> {
    let content_root = root.join(content_dir);
    if !content_root.is_dir() {
        tracing::warn!(path = %content_root.display(), "Content directory not found");
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkBuilder::new(&content_root)
        .standard_filters(false)
        .hidden(true)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .map(ignore::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_discover_only_content_dir() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("content/guides")).unwrap();
        fs::create_dir_all(root.join("static")).unwrap();
        fs::write(root.join("README.md"), "").unwrap();
        fs::write(root.join("static/a.png"), "").unwrap();
        fs::write(root.join("content/index.md"), "").unwrap();
        fs::write(root.join("content/guides/b.md"), "").unwrap();
        fs::write(root.join("content/guides/a.md"), "").unwrap();
        fs::write(root.join("content/notes.txt"), "").unwrap();

        let files = discover(root, Path::new("content"));
        assert_eq!(
            files,
            vec![
                root.join("content/guides/a.md"),
                root.join("content/guides/b.md"),
                root.join("content/index.md"),
                root.join("content/notes.txt"),
            ]
        );
    }

    #[test]
    fn test_discover_skips_hidden() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("content/.git")).unwrap();
        fs::write(root.join("content/.git/config.md"), "").unwrap();
        fs::write(root.join("content/.draft.md"), "").unwrap();
        fs::write(root.join("content/page.md"), "").unwrap();

        assert_eq!(
            discover(root, Path::new("content")),
            vec![root.join("content/page.md")]
        );
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = TempDir::new().unwrap();
        assert!(discover(dir.path(), Path::new("content")).is_empty());
    }
}
