use std::io::{Read, Write};

use camino::Utf8Path;
use color_eyre::eyre::{eyre, Context};
use tracing::*;

use crate::digest::Digest;
use crate::kind::ObjectKind;
use crate::object::{frame, Object};
use crate::repo::Repo;
use crate::Result;

/// Validate `content` as `kind`, then write it if a repo is given. Returns the digest either way.
///
/// The content is hashed and stored exactly as given, never re-encoded.
pub fn hash(repo: Option<&Repo>, kind: ObjectKind, content: &[u8]) -> Result<Digest> {
    let object = Object::parse(kind, content).wrap_err(format!("Content is not a valid {kind}"))?;

    let framed = frame(kind, content);
    let oid = match repo {
        Some(repo) => repo.write_framed(&framed)?,
        None => Digest::new(&framed),
    };

    if let Object::Tree(tree) = &object {
        if !tree.is_sorted() {
            warn!("Tree entries are not in canonical order; git will reject this tree");
        }
    }
    let canonical = object.digest();
    if canonical != oid {
        warn!(%oid, %canonical, "Content is not in canonical form");
    }

    Ok(oid)
}

/// Read the content from standard input when `stdin` is set, otherwise from `file`.
pub fn read_content(stdin: bool, file: Option<&Utf8Path>) -> Result<Vec<u8>> {
    match (stdin, file) {
        (true, _) => {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
        (false, Some(path)) => Ok(std::fs::read(path).wrap_err(format!("Could not read {path}"))?),
        (false, None) => Err(eyre!("Either a file or --stdin is required")),
    }
}

pub fn handle(
    cwd: &Utf8Path,
    kind: ObjectKind,
    write: bool,
    stdin: bool,
    file: Option<&Utf8Path>,
) -> Result<()> {
    let content = read_content(stdin, file)?;

    let repo = if write {
        Some(Repo::discover(cwd)?)
    } else {
        None
    };

    let oid = hash(repo.as_ref(), kind, &content)?;
    writeln!(std::io::stdout().lock(), "{oid:x}")?;
    Ok(())
}
