use bstr::{BStr, BString};

use crate::digest::Digest;
use crate::error::ObjectResult;
use crate::kind::ObjectKind;

use super::kvlm::{parse_digest, Kvlm};

/// A commit: a tree snapshot, its parents, authorship and a message.
///
/// The header list is kept as parsed, so extension headers (`gpgsig`, `encoding`, ...) and the
/// original header order are reproduced exactly on encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    tree: Digest,
    parents: Vec<Digest>,
    kvlm: Kvlm,
}

impl Commit {
    /// Build a commit with headers in git's order: `tree`, `parent`*, `author`, `committer`.
    pub fn new(
        tree: Digest,
        parents: Vec<Digest>,
        author: impl Into<BString>,
        committer: impl Into<BString>,
        message: impl Into<BString>,
    ) -> Self {
        let mut kvlm = Kvlm::new(message).with("tree", tree.to_hex());
        for parent in &parents {
            kvlm.push("parent", parent.to_hex());
        }
        kvlm.push("author", author);
        kvlm.push("committer", committer);

        Self {
            tree,
            parents,
            kvlm,
        }
    }

    /// Validate a parsed header list. `tree`, `author` and `committer` must be present.
    pub fn from_kvlm(kvlm: Kvlm) -> ObjectResult<Self> {
        let tree = kvlm.require_digest(ObjectKind::Commit, "tree")?;
        let parents = kvlm
            .get_all("parent")
            .map(|value| parse_digest("parent", value))
            .collect::<ObjectResult<Vec<_>>>()?;
        kvlm.require(ObjectKind::Commit, "author")?;
        kvlm.require(ObjectKind::Commit, "committer")?;

        Ok(Self {
            tree,
            parents,
            kvlm,
        })
    }

    pub fn parse(bytes: &[u8]) -> ObjectResult<Self> {
        Self::from_kvlm(Kvlm::parse(bytes)?)
    }

    pub fn encode(&self) -> Vec<u8> {
        self.kvlm.encode()
    }

    pub fn tree(&self) -> &Digest {
        &self.tree
    }

    pub fn parents(&self) -> &[Digest] {
        &self.parents
    }

    /// The first parent, or `None` for a root commit.
    pub fn parent(&self) -> Option<&Digest> {
        self.parents.first()
    }

    pub fn author(&self) -> &BStr {
        self.header("author")
    }

    pub fn message(&self) -> &BStr {
        self.kvlm.message()
    }

    // Presence is checked on construction.
    fn header(&self, key: &str) -> &BStr {
        self.kvlm.get(key).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ObjectError;

    const TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

    #[test]
    fn test_root_commit_round_trip() {
        let commit = Commit::new(
            Digest::from_str(TREE).unwrap(),
            vec![],
            "A <a@x> 0 +0000",
            "A <a@x> 0 +0000",
            "init\n",
        );

        let encoded = commit.encode();
        assert_eq!(
            encoded,
            format!("tree {TREE}\nauthor A <a@x> 0 +0000\ncommitter A <a@x> 0 +0000\n\ninit\n")
                .into_bytes()
        );

        let parsed = Commit::parse(&encoded).unwrap();
        assert_eq!(parsed, commit);
        assert_eq!(parsed.parent(), None);
        assert_eq!(parsed.message(), "init\n");
    }

    #[test]
    fn test_merge_commit_keeps_both_parents() {
        let p1 = Digest([1; 20]);
        let p2 = Digest([2; 20]);
        let commit = Commit::new(Digest::default(), vec![p1, p2], "a", "c", "merge\n");

        let parsed = Commit::parse(&commit.encode()).unwrap();
        assert_eq!(parsed.parents(), &[p1, p2]);
        assert_eq!(parsed.parent(), Some(&p1));
    }

    #[test]
    fn test_extension_headers_survive() {
        let input = format!(
            "tree {TREE}\nauthor a\ncommitter c\nencoding ISO-8859-1\ngpgsig -----BEGIN-----\n line\n -----END-----\n\nmsg\n"
        );
        let commit = Commit::parse(input.as_bytes()).unwrap();
        assert_eq!(commit.author(), "a");
        assert_eq!(commit.message(), "msg\n");
        assert_eq!(commit.encode(), input.into_bytes());
    }

    #[test]
    fn test_non_canonical_header_order_is_preserved() {
        let input = format!("author a\ntree {TREE}\ncommitter c\n\nmsg");
        let commit = Commit::parse(input.as_bytes()).unwrap();
        assert_eq!(commit.encode(), input.into_bytes());
    }

    #[test]
    fn test_missing_committer() {
        let input = format!("tree {TREE}\nauthor a\n\nmsg");
        assert!(matches!(
            Commit::parse(input.as_bytes()),
            Err(ObjectError::MissingHeaderKey {
                kind: ObjectKind::Commit,
                key: "committer"
            })
        ));
    }

    #[test]
    fn test_missing_tree() {
        assert!(matches!(
            Commit::parse(b"author a\ncommitter c\n\nmsg"),
            Err(ObjectError::MissingHeaderKey { key: "tree", .. })
        ));
    }

    #[test]
    fn test_bad_parent_digest() {
        let input = format!("tree {TREE}\nparent nothex\nauthor a\ncommitter c\n\n");
        assert!(matches!(
            Commit::parse(input.as_bytes()),
            Err(ObjectError::InvalidDigest { key: "parent", .. })
        ));
    }
}
