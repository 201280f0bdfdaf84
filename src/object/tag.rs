use bstr::{BString, ByteSlice};

use crate::digest::Digest;
use crate::error::{ObjectError, ObjectResult};
use crate::kind::ObjectKind;

use super::kvlm::Kvlm;

/// An annotated tag: a name and message attached to another object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    target: Digest,
    target_kind: ObjectKind,
    name: String,
    kvlm: Kvlm,
}

impl Tag {
    pub fn new(
        target: Digest,
        target_kind: ObjectKind,
        name: impl Into<String>,
        tagger: impl Into<BString>,
        message: impl Into<BString>,
    ) -> Self {
        let name = name.into();
        let kvlm = Kvlm::new(message)
            .with("object", target.to_hex())
            .with("type", target_kind.as_str())
            .with("tag", name.as_str())
            .with("tagger", tagger);

        Self {
            target,
            target_kind,
            name,
            kvlm,
        }
    }

    /// Validate a parsed header list. `object`, `type`, `tag` and `tagger` must be present.
    pub fn from_kvlm(kvlm: Kvlm) -> ObjectResult<Self> {
        let target = kvlm.require_digest(ObjectKind::Tag, "object")?;
        let target_kind = ObjectKind::from_bytes(kvlm.require(ObjectKind::Tag, "type")?)?;
        let name = kvlm
            .require(ObjectKind::Tag, "tag")?
            .to_str()
            .map_err(|_| ObjectError::MalformedHeaderLine("tag name is not valid utf-8".into()))?
            .to_owned();
        kvlm.require(ObjectKind::Tag, "tagger")?;

        Ok(Self {
            target,
            target_kind,
            name,
            kvlm,
        })
    }

    pub fn parse(bytes: &[u8]) -> ObjectResult<Self> {
        Self::from_kvlm(Kvlm::parse(bytes)?)
    }

    pub fn encode(&self) -> Vec<u8> {
        self.kvlm.encode()
    }

    pub fn target(&self) -> &Digest {
        &self.target
    }

    pub fn target_kind(&self) -> ObjectKind {
        self.target_kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
