mod history;
mod init;

use camino::Utf8Path;
use tempfile::TempDir;

use crate::repo::Repo;
use crate::signature::Signature;
use crate::Result;

pub const COMMIT_NAME: &str = "Jamie Quigley";
pub const COMMIT_EMAIL: &str = "jamie@quigley.xyz";

/// A freshly initialised repo in a temporary directory. Keep the `TempDir` alive for as long as
/// the repo is used.
pub fn temp_repo() -> Result<(TempDir, Repo)> {
    let dir = TempDir::new()?;
    let root = Utf8Path::from_path(dir.path())
        .expect("temp dir should be utf-8")
        .to_owned();
    let repo = Repo::init(&root)?;
    Ok((dir, repo))
}

pub fn identity() -> Option<Signature> {
    Some(Signature::now(COMMIT_NAME, COMMIT_EMAIL))
}
