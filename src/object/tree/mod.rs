mod parse;
mod write;

use crate::digest::Digest;
use crate::filemode::FileMode;

/// One `(mode, path, digest)` triple of a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: FileMode,
    pub path: String,
    pub digest: Digest,
}

impl TreeEntry {
    pub fn new(mode: FileMode, path: impl Into<String>, digest: Digest) -> Self {
        Self {
            mode,
            path: path.into(),
            digest,
        }
    }

    /// Git orders entries bytewise by name, with trees compared as though their name ended in
    /// `'/'`.
    fn sort_key(&self) -> impl Iterator<Item = u8> + '_ {
        let suffix = self.mode.is_tree().then_some(b'/');
        self.path.bytes().chain(suffix)
    }
}

/// A directory snapshot: an ordered list of entries.
///
/// Entry order is kept exactly as given or as parsed. [`Tree::is_sorted`] reports whether it is
/// the ordering git itself writes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    pub fn new(entries: Vec<TreeEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Whether entries are already in git's canonical order. Git rejects trees that are not.
    pub fn is_sorted(&self) -> bool {
        self.entries
            .windows(2)
            .all(|pair| pair[0].sort_key().cmp(pair[1].sort_key()).is_lt())
    }
}
