pub mod database;
pub mod refs;

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::eyre::{eyre, Context};
use tracing::*;

use database::Database;

use crate::digest::Digest;
use crate::kind::ObjectKind;
use crate::object::{Commit, Object};
use crate::Result;

const DEFAULT_CONFIG: &str = "\
[core]
\trepositoryformatversion = 0
\tfilemode = false
\tbare = false
";

const DEFAULT_DESCRIPTION: &str =
    "Unnamed repository; edit this file 'description' to name the repository.\n";

pub struct Repo {
    work_tree: Utf8PathBuf,
    git_dir: Utf8PathBuf,
    pub database: Database,
}

impl Repo {
    pub fn open(work_tree: Utf8PathBuf) -> Self {
        let git_dir = work_tree.join(".git");
        let database = Database::new(&git_dir);
        trace!(path=%work_tree, "Opened repo");
        Self {
            work_tree,
            git_dir,
            database,
        }
    }

    /// Create the `.git` skeleton in `work_tree`. Fails if one already exists.
    pub fn init(work_tree: &Utf8Path) -> Result<Self> {
        trace!(path=%work_tree, "Initialising repo");
        let git_dir = work_tree.join(".git");
        if git_dir.exists() {
            return Err(eyre!("Repository already exists: {git_dir}"));
        }

        let repo = Self::open(work_tree.to_owned());
        for d in ["branches", "objects", "refs/tags", "refs/heads"] {
            let dir = git_dir.join(d);
            trace!(path=%dir, "Creating directory");
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(repo.repo_file("description")?, DEFAULT_DESCRIPTION)?;
        std::fs::write(repo.repo_file("HEAD")?, "ref: refs/heads/master\n")?;
        std::fs::write(repo.repo_file("config")?, DEFAULT_CONFIG)?;

        Ok(repo)
    }

    /// Walk up from `start` to the first directory containing `.git`.
    pub fn find_root(start: &Utf8Path) -> Option<Utf8PathBuf> {
        start
            .ancestors()
            .find(|dir| dir.join(".git").is_dir())
            .map(Utf8Path::to_path_buf)
    }

    pub fn discover(start: &Utf8Path) -> Result<Self> {
        let root = Self::find_root(start)
            .ok_or_else(|| eyre!("Not a git repository (or any parent up to /): {start}"))?;
        let repo = Self::open(root);
        debug!(work_tree=%repo.work_tree(), "Discovered repo");
        Ok(repo)
    }

    pub fn work_tree(&self) -> &Utf8Path {
        &self.work_tree
    }

    pub fn git_dir(&self) -> &Utf8Path {
        &self.git_dir
    }

    /// The path of `relative` inside the git directory, with its parent directories created.
    pub fn repo_file(&self, relative: impl AsRef<Utf8Path>) -> Result<Utf8PathBuf> {
        let path = self.git_dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .wrap_err(eyre!("Could not create directory {parent}"))?;
        }
        Ok(path)
    }

    pub fn write_object(&self, object: &Object) -> Result<Digest> {
        let oid = self.database.write(object)?;
        trace!(oid=%oid, kind=%object.kind(), "Wrote object to database");
        Ok(oid)
    }

    /// Store already framed bytes without re-encoding them.
    pub fn write_framed(&self, framed: &[u8]) -> Result<Digest> {
        let oid = self.database.write_framed(framed)?;
        trace!(oid=%oid, "Wrote framed object to database");
        Ok(oid)
    }

    pub fn read_object(&self, oid: &Digest, expected: Option<ObjectKind>) -> Result<Object> {
        trace!(oid=%oid, ?expected, "Reading object from database");
        Ok(self.database.read(oid, expected)?)
    }

    /// Follow tags to their targets, and commits to their trees, until an object of kind `want`
    /// is reached.
    pub fn peel(&self, oid: &Digest, want: ObjectKind) -> Result<Digest> {
        let mut oid = *oid;
        loop {
            let object = self.read_object(&oid, None)?;
            oid = match &object {
                object if object.kind() == want => return Ok(oid),
                Object::Tag(tag) => {
                    trace!(tag=%tag.name(), target=%tag.target(), kind=%tag.target_kind(), "Peeling tag");
                    *tag.target()
                }
                Object::Commit(commit) if want == ObjectKind::Tree => *commit.tree(),
                other => {
                    return Err(eyre!(
                        "Object {oid} is a {}, which cannot be peeled to a {want}",
                        other.kind()
                    ))
                }
            };
        }
    }

    /// Follow first parents from `start`, newest first, stopping at a root commit or at a commit
    /// already visited.
    pub fn first_parent_history(&self, start: &Digest) -> Result<Vec<(Digest, Commit)>> {
        let mut history: Vec<(Digest, Commit)> = Vec::new();
        let mut next = Some(*start);

        while let Some(oid) = next {
            if history.iter().any(|(seen, _)| *seen == oid) {
                debug!(oid=%oid, "History loops back on itself");
                break;
            }
            let commit = self
                .read_object(&oid, Some(ObjectKind::Commit))?
                .into_commit()
                .ok_or_else(|| eyre!("Object {oid} is not a commit"))?;
            next = commit.parent().copied();
            history.push((oid, commit));
        }

        Ok(history)
    }
}
