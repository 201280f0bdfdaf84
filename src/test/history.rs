use pretty_assertions::assert_eq;

use crate::cmd::commit_tree::commit_tree;
use crate::digest::Digest;
use crate::object::{Commit, Object, Tree};
use crate::test::{identity, temp_repo};
use crate::Result;

#[test]
fn first_parent_history_is_newest_first() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let tree = repo.write_object(&Object::Tree(Tree::default()))?.to_hex();

    let a = commit_tree(&repo, &tree, &[], "a", identity())?;
    let b = commit_tree(&repo, &tree, &[a.to_hex()], "b", identity())?;
    let side = commit_tree(&repo, &tree, &[a.to_hex()], "side", identity())?;
    let c = commit_tree(&repo, &tree, &[b.to_hex(), side.to_hex()], "merge", identity())?;

    let history = repo.first_parent_history(&c)?;
    let oids = history.iter().map(|(oid, _)| *oid).collect::<Vec<_>>();
    assert_eq!(oids, [c, b, a]);
    assert_eq!(history[0].1.parents(), &[b, side]);
    assert_eq!(history[2].1.message(), "a\n");
    Ok(())
}

#[test]
fn history_of_a_non_commit_fails() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let tree = repo.write_object(&Object::Tree(Tree::default()))?;

    assert!(repo.first_parent_history(&tree).is_err());
    Ok(())
}

#[test]
fn history_with_missing_parent_fails() -> Result<()> {
    let (_dir, repo) = temp_repo()?;
    let tree = repo.write_object(&Object::Tree(Tree::default()))?;
    let orphan = Commit::new(tree, vec![Digest([9; 20])], "a", "c", "dangling\n");
    let oid = repo.write_object(&Object::Commit(orphan))?;

    assert!(repo.first_parent_history(&oid).is_err());
    Ok(())
}
