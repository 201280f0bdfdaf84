use std::io::Write;

use bstr::ByteSlice;

use crate::kind::ObjectKind;
use crate::repo::Repo;
use crate::Result;

pub fn handle(repo: &Repo, revision: &str) -> Result<()> {
    let start = repo.peel(&repo.resolve_revision(revision)?, ObjectKind::Commit)?;
    let mut stdout = std::io::stdout().lock();

    for (oid, commit) in repo.first_parent_history(&start)? {
        writeln!(stdout, "commit {oid:x}")?;
        if let [first, rest @ ..] = commit.parents() {
            if !rest.is_empty() {
                write!(stdout, "Merge: {}", first.short())?;
                for parent in rest {
                    write!(stdout, " {}", parent.short())?;
                }
                writeln!(stdout)?;
            }
        }
        writeln!(stdout, "Author: {}", commit.author())?;
        writeln!(stdout)?;
        for line in commit.message().lines() {
            writeln!(stdout, "    {}", line.as_bstr())?;
        }
        writeln!(stdout)?;
    }

    Ok(())
}
