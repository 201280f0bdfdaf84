use tracing::*;

use crate::digest::Digest;
use crate::kind::ObjectKind;
use crate::object::{Commit, Object};
use crate::repo::Repo;
use crate::signature::Signature;
use crate::Result;

/// Write a commit of `tree` with the given parents. The author is also the committer.
pub fn commit_tree(
    repo: &Repo,
    tree: &str,
    parents: &[String],
    message: &str,
    author: Option<Signature>,
) -> Result<Digest> {
    let author = super::require_identity(author)?;

    let tree = repo.peel(&repo.resolve_revision(tree)?, ObjectKind::Tree)?;

    let parents = parents
        .iter()
        .map(|parent| -> Result<Digest> {
            repo.peel(&repo.resolve_revision(parent)?, ObjectKind::Commit)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut message = message.to_owned();
    if !message.ends_with('\n') {
        message.push('\n');
    }

    let signature = author.to_string();
    let commit = Commit::new(tree, parents, signature.as_str(), signature.as_str(), message);
    let oid = repo.write_object(&Object::Commit(commit))?;
    debug!(%oid, %tree, "Created commit");
    Ok(oid)
}
