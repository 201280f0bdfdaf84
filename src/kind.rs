use std::fmt::Display;
use std::str::FromStr;

use crate::error::ObjectError;

/// The four kinds of object the store knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
    Tag,
}

impl ObjectKind {
    /// The canonical, lowercase name used in framing headers.
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
            ObjectKind::Tag => "tag",
        }
    }

    /// Parse a kind name from raw header bytes. Matching ignores ASCII case.
    pub fn from_bytes(name: &[u8]) -> Result<Self, ObjectError> {
        [Self::Blob, Self::Tree, Self::Commit, Self::Tag]
            .into_iter()
            .find(|kind| name.eq_ignore_ascii_case(kind.as_str().as_bytes()))
            .ok_or_else(|| ObjectError::UnknownKind(String::from_utf8_lossy(name).into_owned()))
    }
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = ObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bytes(s.as_bytes())
    }
}
