use camino::Utf8Path;
use tempfile::TempDir;

use crate::repo::refs::RefValue;
use crate::repo::Repo;
use crate::test::temp_repo;
use crate::Result;

#[test]
fn init_creates_layout() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let git_dir = repo.git_dir();

    for d in ["objects", "refs/heads", "refs/tags", "branches"] {
        assert!(git_dir.join(d).is_dir(), "{d} should exist");
    }
    assert_eq!(
        repo.read_ref("HEAD")?,
        Some(RefValue::Symbolic("refs/heads/master".to_owned()))
    );

    let config = std::fs::read_to_string(git_dir.join("config"))?;
    assert!(config.starts_with("[core]\n"));
    assert!(config.contains("repositoryformatversion = 0"));
    assert!(git_dir.join("description").is_file());

    Ok(())
}

#[test]
fn init_twice_fails() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    assert!(Repo::init(repo.work_tree()).is_err());
    Ok(())
}

#[test]
fn discover_walks_up_to_the_repo() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let nested = repo.work_tree().join("a/b/c");
    std::fs::create_dir_all(&nested)?;

    assert_eq!(Repo::find_root(&nested).as_deref(), Some(repo.work_tree()));
    assert_eq!(Repo::discover(&nested)?.git_dir(), repo.git_dir());
    Ok(())
}

#[test]
fn discover_outside_a_repo_fails() -> Result<()> {
    let dir = TempDir::new()?;
    let root = Utf8Path::from_path(dir.path()).unwrap();

    // Only meaningful if nothing above the temp dir is a repository.
    if Repo::find_root(root).is_none() {
        assert!(Repo::discover(root).is_err());
    }
    Ok(())
}

#[test]
fn repo_file_creates_parents() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let path = repo.repo_file("refs/remotes/origin/main")?;

    assert!(path.parent().unwrap().is_dir());
    assert!(!path.exists());
    Ok(())
}
