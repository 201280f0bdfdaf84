use std::fmt::Display;

use crate::error::ObjectError;
use crate::kind::ObjectKind;

/// The mode of a tree entry, held numerically.
///
/// Encoded as unpadded octal (`40000`, `100644`), which is the form git hashes. Displayed
/// zero-padded to six digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct FileMode(pub u32);

impl std::fmt::Octal for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:o}", self.0)
    }
}

impl Display for FileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.0)
    }
}

impl FileMode {
    pub const DIRECTORY: FileMode = FileMode(0o040000);
    pub const REGULAR: FileMode = FileMode(0o100644);
    pub const SYMLINK: FileMode = FileMode(0o120000);
    pub const GITLINK: FileMode = FileMode(0o160000);

    const TYPE_MASK: u32 = 0o170000;

    /// Parse the ASCII octal digits of a tree entry. Leading zeros are accepted.
    pub fn parse(text: &[u8]) -> Result<Self, ObjectError> {
        let invalid = || ObjectError::InvalidMode(String::from_utf8_lossy(text).into_owned());
        if text.is_empty() || text.len() > 7 || !text.iter().all(|b| (b'0'..=b'7').contains(b)) {
            return Err(invalid());
        }
        let text = std::str::from_utf8(text).map_err(|_| invalid())?;
        u32::from_str_radix(text, 8).map(Self).map_err(|_| invalid())
    }

    /// The kind of object an entry with this mode points at.
    pub fn object_kind(self) -> Option<ObjectKind> {
        let file_type = FileMode(self.0 & Self::TYPE_MASK);
        if file_type == Self::DIRECTORY {
            Some(ObjectKind::Tree)
        } else if file_type == Self::SYMLINK || file_type.0 == Self::REGULAR.0 & Self::TYPE_MASK {
            Some(ObjectKind::Blob)
        } else if file_type == Self::GITLINK {
            Some(ObjectKind::Commit)
        } else {
            None
        }
    }

    pub fn is_tree(self) -> bool {
        self.0 & Self::TYPE_MASK == Self::DIRECTORY.0
    }
}
