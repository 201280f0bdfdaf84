//! The object codec.
//!
//! Every object is stored and hashed in its framed form, `"<kind> <len>\0<payload>"`. The payload
//! is the blob content verbatim, the binary entry list of a tree, or the header-and-message layout
//! of a commit or tag.

mod blob;
mod commit;
mod kvlm;
mod tag;
pub mod tree;

pub use blob::Blob;
pub use commit::Commit;
pub use tag::Tag;
pub use tree::Tree;

use memchr::memchr;

use crate::digest::Digest;
use crate::error::{ObjectError, ObjectResult};
use crate::kind::ObjectKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
    Tag(Tag),
}

/// Prefix `payload` with its `"<kind> <len>\0"` header.
pub fn frame(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let header = format!("{} {}\0", kind, payload.len());
    let mut framed = Vec::with_capacity(header.len() + payload.len());
    framed.extend_from_slice(header.as_bytes());
    framed.extend_from_slice(payload);
    framed
}

/// Split framed bytes into their kind and payload, checking the declared length.
pub fn unframe(framed: &[u8]) -> ObjectResult<(ObjectKind, &[u8])> {
    let space = memchr(b' ', framed).ok_or(ObjectError::MalformedHeader("no space after kind"))?;
    let nul = memchr(b'\0', framed).ok_or(ObjectError::MalformedHeader("no NUL after length"))?;
    if nul < space {
        return Err(ObjectError::MalformedHeader("NUL before kind separator"));
    }

    let kind = ObjectKind::from_bytes(&framed[..space])?;

    let length = &framed[space + 1..nul];
    if length.is_empty() || !length.iter().all(u8::is_ascii_digit) {
        return Err(ObjectError::MalformedHeader("length is not a decimal number"));
    }
    if length.len() > 1 && length[0] == b'0' {
        return Err(ObjectError::MalformedHeader("length has a leading zero"));
    }
    let declared = std::str::from_utf8(length)
        .ok()
        .and_then(|len| len.parse::<usize>().ok())
        .ok_or(ObjectError::MalformedHeader("length does not fit in usize"))?;

    let payload = &framed[nul + 1..];
    if declared != payload.len() {
        return Err(ObjectError::MalformedLength {
            declared,
            actual: payload.len(),
        });
    }

    Ok((kind, payload))
}

impl Object {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Object::Blob(_) => ObjectKind::Blob,
            Object::Tree(_) => ObjectKind::Tree,
            Object::Commit(_) => ObjectKind::Commit,
            Object::Tag(_) => ObjectKind::Tag,
        }
    }

    /// The canonical payload, without a framing header.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Object::Blob(blob) => blob.data().to_owned(),
            Object::Tree(tree) => tree.encode(),
            Object::Commit(commit) => commit.encode(),
            Object::Tag(tag) => tag.encode(),
        }
    }

    /// The bytes that are hashed and, compressed, written to disk.
    pub fn framed(&self) -> Vec<u8> {
        frame(self.kind(), &self.encode())
    }

    pub fn digest(&self) -> Digest {
        Digest::new(&self.framed())
    }

    /// Parse an unframed payload as an object of the given kind.
    pub fn parse(kind: ObjectKind, payload: &[u8]) -> ObjectResult<Self> {
        Ok(match kind {
            ObjectKind::Blob => Object::Blob(Blob::from(payload)),
            ObjectKind::Tree => Object::Tree(Tree::parse(payload)?),
            ObjectKind::Commit => Object::Commit(Commit::parse(payload)?),
            ObjectKind::Tag => Object::Tag(Tag::parse(payload)?),
        })
    }

    /// Parse framed bytes, as produced by [`Object::framed`].
    pub fn decode(framed: &[u8]) -> ObjectResult<Self> {
        let (kind, payload) = unframe(framed)?;
        Self::parse(kind, payload)
    }

    /// Human-readable form, as printed by `cat-file -p`.
    ///
    /// Trees list one `<mode> <kind> <digest>\t<path>` line per entry; everything else is shown
    /// as its payload.
    pub fn pretty(&self) -> Vec<u8> {
        match self {
            Object::Tree(tree) => {
                let mut out = String::new();
                for entry in tree.entries() {
                    let kind = entry.mode.object_kind().map_or("unknown", ObjectKind::as_str);
                    out.push_str(&format!(
                        "{} {} {:x}\t{}\n",
                        entry.mode, kind, entry.digest, entry.path
                    ));
                }
                out.into_bytes()
            }
            other => other.encode(),
        }
    }

    pub fn into_commit(self) -> Option<Commit> {
        if let Self::Commit(v) = self {
            Some(v)
        } else {
            None
        }
    }
}
