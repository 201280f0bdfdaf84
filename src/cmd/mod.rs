pub mod cat_file;
pub mod commit_tree;
pub mod hash_object;
pub mod log;
pub mod refs;
pub mod tag;

use color_eyre::eyre::eyre;

use crate::interface::Opt;
use crate::signature::Signature;
use crate::Result;

/// The identity configured through `--author-name`/`--author-email` or the environment.
pub fn identity(opt: &Opt) -> Option<Signature> {
    match (&opt.author_name, &opt.author_email) {
        (Some(name), Some(email)) => Some(Signature::now(name, email)),
        _ => None,
    }
}

/// Commits and annotated tags need somebody to attribute them to.
fn require_identity(identity: Option<Signature>) -> Result<Signature> {
    identity.ok_or_else(|| eyre!("No identity configured: set GOB_AUTHOR_NAME and GOB_AUTHOR_EMAIL"))
}
