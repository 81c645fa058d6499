use std::{fs, path::Path};

use tracing::{debug, warn};

/// Loads every `*.js` file under the userscripts directory, sorted by file
/// name so injection order is stable. Unreadable files are logged and
/// skipped.
pub(crate) fn load_userscripts(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            debug!("userscripts directory {} not readable: {error}", dir.display());
            return Vec::new();
        }
    };

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|extension| extension.to_str())
                .is_some_and(|extension| extension.eq_ignore_ascii_case("js"))
        })
        .collect();
    paths.sort();

    let mut scripts = Vec::with_capacity(paths.len());
    for path in paths {
        match fs::read_to_string(&path) {
            Ok(source) => scripts.push(source),
            Err(error) => warn!("skipping userscript {}: {error}", path.display()),
        }
    }
    scripts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_only_js_files_in_name_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("b.js"), "second").expect("write");
        fs::write(dir.path().join("a.js"), "first").expect("write");
        fs::write(dir.path().join("notes.txt"), "nope").expect("write");

        let scripts = load_userscripts(dir.path());
        assert_eq!(scripts, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn missing_directory_yields_no_scripts() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_userscripts(&dir.path().join("missing")).is_empty());
    }
}
