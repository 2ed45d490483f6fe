//! Git repository helpers.

use archimind_core::{AppError, AppResult};
use std::path::Path;

/// What `clone_repository` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneOutcome {
    Cloned,
    /// The target path already existed, so nothing was fetched
    AlreadyPresent,
}

/// Derive a repository name from its URL: the last path segment with any
/// trailing `/` and `.git` removed.
pub fn repo_name(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit(['/', ':']).next().unwrap_or(trimmed);
    last.strip_suffix(".git").unwrap_or(last).to_string()
}

/// Clone `url` into `target` unless `target` already exists.
///
/// Blocking; run it on a blocking thread from async code.
pub fn clone_repository(url: &str, target: &Path) -> AppResult<CloneOutcome> {
    if target.exists() {
        tracing::info!(
            "Repository already exists at {}, skipping clone",
            target.display()
        );
        return Ok(CloneOutcome::AlreadyPresent);
    }

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!("Cloning {} into {}", url, target.display());
    git2::Repository::clone(url, target)
        .map_err(|e| AppError::Analysis(format!("Failed to clone {}: {}", url, e.message())))?;
    tracing::info!("Clone complete: {}", target.display());

    Ok(CloneOutcome::Cloned)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Create a repository with one commit containing `files`.
    pub(crate) fn init_repo(dir: &Path, files: &[(&str, &str)]) {
        let repo = git2::Repository::init(dir).unwrap();
        let mut index = repo.index().unwrap();
        for (name, content) in files {
            let path = dir.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, content).unwrap();
            index.add_path(Path::new(name)).unwrap();
        }
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("Test", "test@example.com").unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "initial", &tree, &[])
            .unwrap();
    }

    #[test]
    fn test_repo_name() {
        assert_eq!(repo_name("https://github.com/acme/shop-api.git"), "shop-api");
        assert_eq!(repo_name("https://github.com/acme/shop-api/"), "shop-api");
        assert_eq!(repo_name("git@github.com:acme/tools.git"), "tools");
        assert_eq!(repo_name("shop"), "shop");
    }

    #[test]
    fn test_clone_local_repository() {
        let source = TempDir::new().unwrap();
        init_repo(source.path(), &[("main.py", "print('hi')\n")]);

        let dest = TempDir::new().unwrap();
        let target = dest.path().join("repos/main");
        let outcome = clone_repository(source.path().to_str().unwrap(), &target).unwrap();

        assert_eq!(outcome, CloneOutcome::Cloned);
        assert!(target.join("main.py").exists());
    }

    #[test]
    fn test_existing_target_is_skipped() {
        let dest = TempDir::new().unwrap();
        let outcome = clone_repository("https://invalid.example/repo.git", dest.path()).unwrap();
        assert_eq!(outcome, CloneOutcome::AlreadyPresent);
    }

    #[test]
    fn test_clone_failure_is_analysis_error() {
        let dest = TempDir::new().unwrap();
        let missing = dest.path().join("no-such-repo");
        let result = clone_repository(missing.to_str().unwrap(), &dest.path().join("out"));
        assert!(matches!(result, Err(AppError::Analysis(_))));
    }
}
