//! Mapping of command line paths to i18n directories.
//!
//! A strawberry.py project keeps one set of catalogs per repository:
//! - `<root>/pie/` for the core
//! - `<root>/modules/<repo>/` for every module repository
//!
//! In detached mode (module repositories checked out on their own) the root is
//! the closest directory with a `.git` subdirectory, and the root itself is the
//! i18n directory.

use std::{
    collections::BTreeSet,
    fmt,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use walkdir::WalkDir;

/// File marking the root of a strawberry.py project.
pub const ROOT_MARKER_FILE: &str = "strawberry.py";

/// Directory marking the root of a detached repository.
pub const DETACHED_ROOT_MARKER_DIR: &str = ".git";

pub const CORE_DIR: &str = "pie";
pub const MODULES_DIR: &str = "modules";

const PYTHON_EXTENSION: &str = "py";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    MissingPath(PathBuf),
    NoRoot(PathBuf),
    MultipleRoots(PathBuf, PathBuf),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::MissingPath(path) => {
                write!(f, "Specified path '{}' does not exist.", path.display())
            }
            DiscoveryError::NoRoot(path) => {
                write!(f, "Could not find project root for '{}'.", display_path(path))
            }
            DiscoveryError::MultipleRoots(first, second) => write!(
                f,
                "Multiple project roots detected:\n- {}\n- {}",
                display_path(first),
                display_path(second)
            ),
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// I18n directories found for a set of input paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub root: PathBuf,
    /// Sorted and deduplicated.
    pub directories: Vec<PathBuf>,
    /// Inputs that do not belong to any i18n directory.
    pub ignored: Vec<PathBuf>,
}

/// Path as shown to the user: relative to the working directory when possible.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));
    match relative {
        Some(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Some(relative) => relative.display().to_string(),
        None => path.display().to_string(),
    }
}

/// Check that all paths exist and make them absolute. The result is sorted.
pub fn resolve_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut resolved = Vec::with_capacity(paths.len());
    for path in paths {
        if !path.exists() {
            return Err(DiscoveryError::MissingPath(path.clone()).into());
        }
        let absolute = path
            .canonicalize()
            .with_context(|| format!("Failed to resolve path: {}", path.display()))?;
        resolved.push(absolute);
    }
    resolved.sort();
    Ok(resolved)
}

fn is_root_directory(path: &Path, detached: bool) -> bool {
    if detached {
        path.join(DETACHED_ROOT_MARKER_DIR).is_dir()
    } else {
        path.join(ROOT_MARKER_FILE).is_file()
    }
}

/// Closest directory (the path itself included) that is a project root.
pub fn find_root(path: &Path, detached: bool) -> Option<PathBuf> {
    path.ancestors()
        .find(|ancestor| is_root_directory(ancestor, detached))
        .map(Path::to_path_buf)
}

/// Group resolved paths into i18n directories.
pub fn find_directories(paths: &[PathBuf], detached: bool) -> Result<Discovery> {
    let mut root: Option<PathBuf> = None;
    let mut directories = BTreeSet::new();
    let mut ignored = Vec::new();

    for path in paths {
        let path_root =
            find_root(path, detached).ok_or_else(|| DiscoveryError::NoRoot(path.clone()))?;
        let root = root.get_or_insert_with(|| path_root.clone());
        if *root != path_root {
            return Err(DiscoveryError::MultipleRoots(root.clone(), path_root).into());
        }

        match i18n_directory(root, path) {
            Some(directory) => {
                directories.insert(directory);
            }
            None if detached => {
                directories.insert(root.clone());
            }
            None => ignored.push(path.clone()),
        }
    }

    Ok(Discovery {
        root: root.unwrap_or_default(),
        directories: directories.into_iter().collect(),
        ignored,
    })
}

/// `<root>/pie` or `<root>/modules/<repo>` containing `path`.
fn i18n_directory(root: &Path, path: &Path) -> Option<PathBuf> {
    let relative = path.strip_prefix(root).ok()?;
    let mut components = relative.components().map(|c| c.as_os_str());

    match components.next()?.to_str()? {
        CORE_DIR => Some(root.join(CORE_DIR)),
        MODULES_DIR => {
            let repository = root.join(MODULES_DIR).join(components.next()?);
            repository.is_dir().then_some(repository)
        }
        _ => None,
    }
}

/// All Python files under `directory`, sorted.
pub fn python_files(directory: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(directory) {
        let entry = entry
            .with_context(|| format!("Failed to list directory: {}", directory.display()))?;
        let is_python = entry
            .path()
            .extension()
            .is_some_and(|extension| extension == PYTHON_EXTENSION);
        if entry.file_type().is_file() && is_python {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::{TempDir, tempdir};

    use super::*;

    /// strawberry.py project with one core file and two module repositories.
    fn project() -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        for file in [
            "strawberry.py",
            "pie/utils.py",
            "modules/base/admin/module.py",
            "modules/fun/dice/module.py",
            "tests/test_utils.py",
        ] {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        (dir, root)
    }

    #[test]
    fn test_resolve_missing_path() {
        let err = resolve_paths(&[PathBuf::from("does/not/exist")]).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DiscoveryError>(),
            Some(&DiscoveryError::MissingPath(PathBuf::from("does/not/exist")))
        );
    }

    #[test]
    fn test_find_root() {
        let (_dir, root) = project();

        assert_eq!(find_root(&root.join("modules/base/admin"), false), Some(root.clone()));
        assert_eq!(find_root(&root, false), Some(root.clone()));
        assert_eq!(find_root(&root, true), None);
    }

    #[test]
    fn test_find_directories() {
        let (_dir, root) = project();
        let paths = [
            root.join("modules/fun/dice/module.py"),
            root.join("pie"),
            root.join("modules/base/admin"),
            root.join("modules/base"),
        ];

        let discovery = find_directories(&paths, false).unwrap();

        assert_eq!(discovery.root, root);
        assert_eq!(
            discovery.directories,
            vec![
                root.join("modules/base"),
                root.join("modules/fun"),
                root.join("pie")
            ]
        );
        assert!(discovery.ignored.is_empty());
    }

    #[test]
    fn test_find_directories_ignores_other_paths() {
        let (_dir, root) = project();
        let paths = [root.join("tests"), root.clone()];

        let discovery = find_directories(&paths, false).unwrap();

        assert!(discovery.directories.is_empty());
        assert_eq!(discovery.ignored, paths.to_vec());
    }

    #[test]
    fn test_find_directories_detached() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(root.join("admin")).unwrap();

        let discovery = find_directories(&[root.join("admin")], true).unwrap();

        assert_eq!(discovery.directories, vec![root.clone()]);
    }

    #[test]
    fn test_find_directories_multiple_roots() {
        let (_first_dir, first) = project();
        let (_second_dir, second) = project();

        let err = find_directories(&[first.join("pie"), second.join("pie")], false).unwrap_err();

        assert_eq!(
            err.downcast_ref::<DiscoveryError>(),
            Some(&DiscoveryError::MultipleRoots(first, second))
        );
    }

    #[test]
    fn test_find_directories_without_root() {
        let dir = tempdir().unwrap();
        let path = dir.path().canonicalize().unwrap();

        let err = find_directories(&[path.clone()], false).unwrap_err();

        assert_eq!(
            err.downcast_ref::<DiscoveryError>(),
            Some(&DiscoveryError::NoRoot(path))
        );
    }

    #[test]
    fn test_multiple_roots_are_shown_relative_to_cwd() {
        let cwd = std::env::current_dir().unwrap();
        let err = DiscoveryError::MultipleRoots(cwd.join("bot"), cwd.join("other/bot"));

        assert_eq!(
            err.to_string(),
            "Multiple project roots detected:\n- bot\n- other/bot"
        );
    }

    #[test]
    fn test_display_path() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(display_path(&cwd), ".");
        assert_eq!(display_path(&cwd.join("pie")), "pie");

        let path = Path::new("/definitely/not/the/working/directory/pie");
        assert_eq!(display_path(path), "/definitely/not/the/working/directory/pie");
    }

    #[test]
    fn test_python_files_are_sorted() {
        let (_dir, root) = project();
        fs::write(root.join("modules/base/admin/database.py"), "").unwrap();
        fs::write(root.join("modules/base/admin/README.md"), "").unwrap();

        let files = python_files(&root.join("modules/base")).unwrap();

        assert_eq!(
            files,
            vec![
                root.join("modules/base/admin/database.py"),
                root.join("modules/base/admin/module.py"),
            ]
        );
    }
}
