//! Path facts about the working directory

use std::path::{Path, PathBuf};

/// PATH_REALPATH, PATH_DIRNAME and PATH_BASENAME
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFacts {
    pub realpath: String,
    pub dirname: String,
    pub basename: String,
}

impl PathFacts {
    /// Derive the facts for `cwd`
    ///
    /// Symlinks are resolved when possible; an unresolvable directory is
    /// reported as given. `/` is its own dirname and basename, like the
    /// coreutils commands.
    pub fn from_dir(cwd: &Path) -> Self {
        let real: PathBuf = cwd.canonicalize().unwrap_or_else(|e| {
            tracing::debug!("Could not canonicalize {}: {}", cwd.display(), e);
            cwd.to_path_buf()
        });

        let dirname = match real.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
            Some(_) => ".".to_string(),
            None => real.display().to_string(),
        };

        let basename = real
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| real.display().to_string());

        Self {
            realpath: real.display().to_string(),
            dirname,
            basename,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_dir() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("my-project");
        std::fs::create_dir(&project).unwrap();

        let facts = PathFacts::from_dir(&project);
        let real_parent = dir.path().canonicalize().unwrap();

        assert_eq!(facts.basename, "my-project");
        assert_eq!(facts.dirname, real_parent.display().to_string());
        assert_eq!(
            facts.realpath,
            real_parent.join("my-project").display().to_string()
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_from_dir_resolves_symlink() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("real");
        std::fs::create_dir(&target).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let facts = PathFacts::from_dir(&link);
        assert_eq!(facts.basename, "real");
    }

    #[cfg(unix)]
    #[test]
    fn test_root() {
        let facts = PathFacts::from_dir(Path::new("/"));
        assert_eq!(facts.realpath, "/");
        assert_eq!(facts.dirname, "/");
        assert_eq!(facts.basename, "/");
    }

    #[test]
    fn test_missing_dir_kept_as_given() {
        let facts = PathFacts::from_dir(Path::new("/nonexistent_12345/app"));
        assert_eq!(facts.realpath, "/nonexistent_12345/app");
        assert_eq!(facts.dirname, "/nonexistent_12345");
        assert_eq!(facts.basename, "app");
    }
}
