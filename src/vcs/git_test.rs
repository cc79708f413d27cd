use super::*;
use std::fs;
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(dir)
        .args(["-c", "user.name=nlx", "-c", "user.email=nlx@example.com"])
        .args(args)
        .output()
        .unwrap()
        .status;
    assert!(status.success(), "git {:?} failed", args);
}

/// 1コミットを持つリポジトリを作る
fn committed_repo() -> TempDir {
    let temp = TempDir::new().unwrap();
    git(temp.path(), &["init", "--quiet"]);
    fs::write(temp.path().join("README.md"), "hello\n").unwrap();
    git(temp.path(), &["add", "README.md"]);
    git(temp.path(), &["commit", "--quiet", "-m", "initial"]);
    temp
}

#[test]
fn test_discover_finds_toplevel_from_subdirectory() {
    if !git_available() {
        return;
    }
    let temp = committed_repo();
    let sub = temp.path().join("data");
    fs::create_dir(&sub).unwrap();

    let workspace = GitWorkspace::discover(&sub).unwrap();

    assert_eq!(workspace.root(), temp.path().canonicalize().unwrap());
}

#[test]
fn test_discover_outside_repository_fails() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();

    let result = GitWorkspace::discover(temp.path());

    assert!(matches!(result, Err(NlxError::Vcs(_))));
}

#[test]
fn test_clean_repository_is_ready() {
    if !git_available() {
        return;
    }
    let temp = committed_repo();
    let workspace = GitWorkspace::discover(temp.path()).unwrap();

    assert!(workspace.is_ready());
}

#[test]
fn test_untracked_files_do_not_block() {
    if !git_available() {
        return;
    }
    let temp = committed_repo();
    fs::write(temp.path().join("scratch.txt"), "tmp").unwrap();
    let workspace = GitWorkspace::discover(temp.path()).unwrap();

    assert!(workspace.is_ready());
}

#[test]
fn test_modified_tracked_file_is_not_ready() {
    if !git_available() {
        return;
    }
    let temp = committed_repo();
    fs::write(temp.path().join("README.md"), "changed\n").unwrap();
    let workspace = GitWorkspace::discover(temp.path()).unwrap();

    assert!(!workspace.is_ready());
    assert_eq!(workspace.changed_files().unwrap(), vec!["README.md".to_string()]);
}

#[test]
fn test_provenance_reports_head_commit() {
    if !git_available() {
        return;
    }
    let temp = committed_repo();
    let workspace = GitWorkspace::discover(temp.path()).unwrap();

    let provenance = workspace.provenance().unwrap();

    assert_eq!(provenance.commit.len(), 40);
    assert!(provenance.commit.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(provenance.branch.is_some());
}

#[test]
fn test_provenance_without_commits_fails() {
    if !git_available() {
        return;
    }
    let temp = TempDir::new().unwrap();
    git(temp.path(), &["init", "--quiet"]);
    let workspace = GitWorkspace::discover(temp.path()).unwrap();

    assert!(workspace.provenance().is_err());
}
