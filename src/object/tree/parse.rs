use memchr::memchr;

use crate::digest::{Digest, DIGEST_LEN};
use crate::error::{ObjectError, ObjectResult};
use crate::filemode::FileMode;

use super::{Tree, TreeEntry};

impl Tree {
    /// Parse a tree payload: entries of the form `<mode> <path>\0<20 raw digest bytes>`,
    /// back to back until the input runs out.
    pub fn parse(bytes: &[u8]) -> ObjectResult<Self> {
        let mut entries = Vec::new();
        let mut cursor = 0;

        while cursor < bytes.len() {
            let (entry, len) = TreeEntry::parse(&bytes[cursor..])
                .map_err(|e| match e {
                    ObjectError::TruncatedTreeEntry { offset } => ObjectError::TruncatedTreeEntry {
                        offset: cursor + offset,
                    },
                    e => e,
                })?;
            entries.push(entry);
            cursor += len;
        }

        Ok(Self::new(entries))
    }
}

impl TreeEntry {
    /// Parse the entry at the start of `bytes`, returning it with the number of bytes consumed.
    fn parse(bytes: &[u8]) -> ObjectResult<(Self, usize)> {
        let mode_end = memchr(b' ', bytes).ok_or(ObjectError::TruncatedTreeEntry { offset: 0 })?;
        let path_start = mode_end + 1;
        let path_end = memchr(b'\0', &bytes[path_start..])
            .map(|i| path_start + i)
            .ok_or(ObjectError::TruncatedTreeEntry { offset: 0 })?;
        let digest_start = path_end + 1;
        let digest_end = digest_start + DIGEST_LEN;

        let raw_digest = bytes
            .get(digest_start..digest_end)
            .ok_or(ObjectError::TruncatedTreeEntry { offset: 0 })?;

        let mode = FileMode::parse(&bytes[..mode_end])?;
        let path = std::str::from_utf8(&bytes[path_start..path_end])
            .map_err(ObjectError::InvalidEntryPath)?
            .to_owned();
        let digest = Digest::from_raw(raw_digest).ok_or(ObjectError::TruncatedTreeEntry { offset: 0 })?;

        Ok((Self::new(mode, path, digest), digest_end))
    }
}
