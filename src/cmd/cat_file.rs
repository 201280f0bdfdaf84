use std::io::Write;

use color_eyre::eyre::eyre;

use crate::kind::ObjectKind;
use crate::repo::Repo;
use crate::Result;

/// `cat-file <kind> <object>` prints the payload, peeling tags and commits down to `kind`. `-p`
/// pretty-prints and `-t` prints the kind.
pub fn handle(repo: &Repo, pretty: bool, show_kind: bool, args: &[String]) -> Result<()> {
    let output = match args {
        [object] if pretty || show_kind => {
            let oid = repo.resolve_revision(object)?;
            let object = repo.read_object(&oid, None)?;
            if show_kind {
                format!("{}\n", object.kind()).into_bytes()
            } else {
                object.pretty()
            }
        }
        [kind, object] if !(pretty || show_kind) => {
            let kind: ObjectKind = kind.parse()?;
            let oid = repo.peel(&repo.resolve_revision(object)?, kind)?;
            repo.read_object(&oid, Some(kind))?.encode()
        }
        _ => {
            return Err(eyre!(
                "usage: cat-file <kind> <object> | cat-file (-p | -t) <object>"
            ))
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output)?;
    stdout.flush()?;
    Ok(())
}
