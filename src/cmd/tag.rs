use color_eyre::eyre::eyre;
use tracing::*;

use crate::digest::Digest;
use crate::object::{Object, Tag};
use crate::repo::Repo;
use crate::signature::Signature;
use crate::Result;

/// Create `refs/tags/<name>`. With a message, an annotated tag object is written and the ref
/// points at it; otherwise the ref points straight at `object`.
pub fn create_tag(
    repo: &Repo,
    name: &str,
    object: &str,
    message: Option<&str>,
    tagger: Option<Signature>,
) -> Result<Digest> {
    let ref_name = format!("refs/tags/{name}");
    if repo.read_ref(&ref_name)?.is_some() {
        return Err(eyre!("Tag already exists: {name}"));
    }

    let target = repo.resolve_revision(object)?;

    let oid = match message {
        None => target,
        Some(message) => {
            let target_kind = repo.read_object(&target, None)?.kind();
            let tagger = super::require_identity(tagger)?.to_string();
            let mut message = message.to_owned();
            if !message.ends_with('\n') {
                message.push('\n');
            }
            let tag = Tag::new(target, target_kind, name, tagger, message);
            repo.write_object(&Object::Tag(tag))?
        }
    };

    repo.update_ref(&ref_name, &oid)?;
    debug!(tag=%name, %oid, "Created tag");
    Ok(oid)
}
