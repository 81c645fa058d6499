use std::{fs, path::Path};

/// Whether a configured directory path is usable: non-empty, no interior
/// NULs, and either the path itself or its parent already exists.
pub(crate) fn is_valid_path(raw: &str) -> bool {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains('\0') {
        return false;
    }

    let path = Path::new(trimmed);
    if path.exists() {
        return true;
    }
    path.parent().is_some_and(Path::exists)
}

pub(crate) fn ensure_dirs<'a>(dirs: impl IntoIterator<Item = &'a Path>) -> Result<(), String> {
    for dir in dirs {
        fs::create_dir_all(dir)
            .map_err(|error| format!("Failed to create directory {}: {}", dir.display(), error))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_blank_paths() {
        assert!(!is_valid_path(""));
        assert!(!is_valid_path("   "));
        assert!(!is_valid_path("a\0b"));
    }

    #[test]
    fn accepts_a_path_whose_parent_exists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let child = dir.path().join("not-created-yet");
        assert!(is_valid_path(child.to_str().expect("utf8 path")));
    }

    #[test]
    fn accepts_an_existing_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(is_valid_path(dir.path().to_str().expect("utf8 path")));
    }

    #[test]
    fn rejects_a_path_with_no_existing_ancestry() {
        let dir = tempfile::tempdir().expect("tempdir");
        let orphan = dir.path().join("missing").join("deeper");
        assert!(!is_valid_path(orphan.to_str().expect("utf8 path")));
    }

    #[test]
    fn ensure_dirs_creates_nested_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = dir.path().join("swap/models");
        let b = dir.path().join("scripts");
        ensure_dirs([a.as_path(), b.as_path()]).expect("ensure_dirs");
        assert!(a.is_dir());
        assert!(b.is_dir());
    }
}
