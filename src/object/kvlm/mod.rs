//! The key-value-with-message layout shared by commits and tags:
//!
//! ```text
//! tree 4b825dc642cb6eb9a060e54bf8d69288fbee4904
//! author A U Thor <author@example.com> 1658312219 +0100
//! committer A U Thor <author@example.com> 1658312219 +0100
//!
//! message
//! ```
//!
//! Headers are kept as an ordered list of pairs, so repeated keys (`parent` on a merge) survive
//! a round trip. A line starting with a single space continues the previous header's value.

mod parse;
mod write;

use std::str::FromStr;

use bstr::{BStr, BString, ByteSlice};

use crate::digest::Digest;
use crate::error::{ObjectError, ObjectResult};
use crate::kind::ObjectKind;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Kvlm {
    headers: Vec<(BString, BString)>,
    message: BString,
}

impl Kvlm {
    pub fn new(message: impl Into<BString>) -> Self {
        Self {
            headers: Vec::new(),
            message: message.into(),
        }
    }

    /// Append a header. Keys must be non-empty and contain no space or newline.
    pub fn push(&mut self, key: impl Into<BString>, value: impl Into<BString>) {
        let key = key.into();
        debug_assert!(
            !key.is_empty() && !key.contains(&b' ') && !key.contains(&b'\n'),
            "invalid header key: {key:?}"
        );
        self.headers.push((key, value.into()));
    }

    pub fn with(mut self, key: impl Into<BString>, value: impl Into<BString>) -> Self {
        self.push(key, value);
        self
    }

    /// The first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&BStr> {
        self.headers
            .iter()
            .find(|(k, _)| k == key.as_bytes())
            .map(|(_, v)| v.as_bstr())
    }

    /// Every value stored under `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a BStr> + 'a {
        self.headers
            .iter()
            .filter(move |(k, _)| k == key.as_bytes())
            .map(|(_, v)| v.as_bstr())
    }

    pub fn message(&self) -> &BStr {
        self.message.as_bstr()
    }
}

// Field extraction used by the typed commit and tag views.
impl Kvlm {
    pub(in crate::object) fn require(&self, kind: ObjectKind, key: &'static str) -> ObjectResult<&BStr> {
        self.get(key)
            .ok_or(ObjectError::MissingHeaderKey { kind, key })
    }

    pub(in crate::object) fn require_digest(
        &self,
        kind: ObjectKind,
        key: &'static str,
    ) -> ObjectResult<Digest> {
        parse_digest(key, self.require(kind, key)?)
    }
}

pub(in crate::object) fn parse_digest(key: &'static str, value: &BStr) -> ObjectResult<Digest> {
    value
        .to_str()
        .ok()
        .and_then(|hex| Digest::from_str(hex).ok())
        .ok_or_else(|| ObjectError::InvalidDigest {
            key,
            value: value.to_str_lossy().into_owned(),
        })
}
