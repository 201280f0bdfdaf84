use std::io::Write;
use std::str::FromStr;

use color_eyre::eyre::{eyre, Context};
use tracing::*;

use crate::digest::Digest;
use crate::lock::LockedFile;
use crate::Result;

/// Symbolic refs are followed at most this many times before giving up.
const MAX_SYMREF_DEPTH: usize = 5;

/// Contains all characters that cannot appear in a ref name.
///
/// Git uses C-Strings; the character `'\0'` denotes the end of a ref name. We disallow it
/// entirely, along with `'*'`.
///
/// See: <https://github.com/git/git/blob/795ea8776befc95ea2becd8020c7a284677b4161/refs.c#L48-L57>
const DISALLOWED_CHARACTERS: [char; 41] = [
    '\0', '\x01', '\x02', '\x03', '\x04', '\x05', '\x06', '\x07', '\x08', '\t', '\n', '\x0b',
    '\x0c', '\r', '\x0e', '\x0f', '\x10', '\x11', '\x12', '\x13', '\x14', '\x15', '\x16', '\x17',
    '\x18', '\x19', '\x1a', '\x1b', '\x1c', '\x1d', '\x1e', '\x1f', ' ', '*', ':', '?', '[', '\\',
    '^', '~', '\x7f',
];

/// Check whether a string is a valid ref name.
///
/// Disallowed names are any where:
/// - it (or any path component) begins with `'.'`
/// - it contains double dots `".."`
/// - it contains ASCII control characters
/// - it contains `':'`, `'?'`, `'['`, `'\\'`, `'^'`, `'~'`, `' '`, `'*'` or `'\t'`
/// - it starts or ends with `'/'`, or contains `"//"`
/// - it ends with `".lock"`
/// - it contains `"@{"`
/// - it is empty or exactly `"@"`
///
/// See: <https://github.com/git/git/blob/795ea8776befc95ea2becd8020c7a284677b4161/refs.c#L59-L77>
pub fn is_valid_ref_name(name: &str) -> bool {
    !(name.is_empty()
        || name == "@"
        || name.chars().any(|c| DISALLOWED_CHARACTERS.contains(&c))
        || name.starts_with('.')
        || name.starts_with('/')
        || name.contains("/.")
        || name.contains("..")
        || name.contains("//")
        || name.ends_with('/')
        || name.ends_with(".lock")
        || name.contains("@{"))
}

/// The content of a ref file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefValue {
    /// `ref: <path>\n`, naming another ref relative to the git directory.
    Symbolic(String),
    /// A bare 40-character hex digest followed by `\n`.
    Direct(Digest),
}

impl FromStr for RefValue {
    type Err = color_eyre::Report;

    fn from_str(contents: &str) -> Result<Self> {
        let contents = contents.trim_end();
        if let Some(target) = contents.strip_prefix("ref: ") {
            Ok(Self::Symbolic(target.trim().to_owned()))
        } else {
            let digest = Digest::from_str(contents)
                .wrap_err(eyre!("Unexpected ref contents: {contents:?}"))?;
            Ok(Self::Direct(digest))
        }
    }
}

fn check_name(name: &str) -> Result<()> {
    if is_valid_ref_name(name) {
        Ok(())
    } else {
        Err(eyre!("Invalid ref name: {name}"))
    }
}

impl super::Repo {
    /// Read a ref file such as `HEAD` or `refs/heads/master`. `None` if it does not exist.
    pub fn read_ref(&self, name: &str) -> Result<Option<RefValue>> {
        check_name(name)?;
        let path = self.git_dir.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        Ok(Some(contents.parse::<RefValue>().wrap_err(eyre!("Could not read ref {name}"))?))
    }

    /// Follow symbolic refs down to a digest. `None` if the chain ends at a ref that does not
    /// exist, such as `HEAD` in a repo with no commits.
    pub fn resolve_ref(&self, name: &str) -> Result<Option<Digest>> {
        let mut name = name.to_owned();
        for _ in 0..=MAX_SYMREF_DEPTH {
            match self.read_ref(&name)? {
                None => return Ok(None),
                Some(RefValue::Direct(oid)) => return Ok(Some(oid)),
                Some(RefValue::Symbolic(target)) => {
                    trace!(from=%name, to=%target, "Following symbolic ref");
                    name = target;
                }
            }
        }
        Err(eyre!("Too many levels of symbolic refs at {name}"))
    }

    /// Point `name` at `oid`. If `name` is a symbolic ref, the ref it points to is updated.
    pub fn update_ref(&self, name: &str, oid: &Digest) -> Result<()> {
        let target = self.symref_target(name)?;
        debug!(name=%target, oid=%oid, "Updating ref");
        self.write_ref_file(&target, &format!("{oid:x}\n"))
    }

    /// Make `name` a symbolic ref to `target`, which must live under `refs/`.
    pub fn set_symbolic_ref(&self, name: &str, target: &str) -> Result<()> {
        check_name(name)?;
        check_name(target)?;
        if !target.starts_with("refs/") {
            return Err(eyre!("Refusing to point {name} outside of refs/: {target}"));
        }
        debug!(%name, %target, "Setting symbolic ref");
        self.write_ref_file(name, &format!("ref: {target}\n"))
    }

    /// Resolve a revision to a digest.
    ///
    /// Accepts `HEAD` or `@`, a full hex digest, or a ref name, which is looked up as given and
    /// then under `refs/`, `refs/tags/` and `refs/heads/`.
    pub fn resolve_revision(&self, rev: &str) -> Result<Digest> {
        if let Ok(oid) = Digest::from_str(rev) {
            return Ok(oid);
        }

        let rev = if rev == "@" { "HEAD" } else { rev };
        check_name(rev)?;

        for candidate in [
            rev.to_owned(),
            format!("refs/{rev}"),
            format!("refs/tags/{rev}"),
            format!("refs/heads/{rev}"),
        ] {
            if let Some(oid) = self.resolve_ref(&candidate)? {
                return Ok(oid);
            }
        }

        Err(eyre!("Unknown revision: {rev}"))
    }

    fn symref_target(&self, name: &str) -> Result<String> {
        let mut name = name.to_owned();
        for _ in 0..=MAX_SYMREF_DEPTH {
            match self.read_ref(&name)? {
                Some(RefValue::Symbolic(target)) => name = target,
                _ => return Ok(name),
            }
        }
        Err(eyre!("Too many levels of symbolic refs at {name}"))
    }

    fn write_ref_file(&self, name: &str, contents: &str) -> Result<()> {
        check_name(name)?;
        let path = self.repo_file(name)?;
        let mut lock = LockedFile::try_acquire(&path)?
            .ok_or_else(|| eyre!("Could not acquire lock file `{path}.lock`"))?;
        lock.write_all(contents.as_bytes())?;
        lock.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_names() {
        for valid in ["HEAD", "refs/heads/master", "refs/tags/v1.0", "feature/x-y_z"] {
            assert!(is_valid_ref_name(valid), "{valid}");
        }
        for invalid in [
            "",
            "@",
            ".hidden",
            "refs/heads/.hidden",
            "a..b",
            "a//b",
            "/abs",
            "trailing/",
            "master.lock",
            "with space",
            "what?",
            "x@{1}",
            "star*",
            "nul\0byte",
        ] {
            assert!(!is_valid_ref_name(invalid), "{invalid:?}");
        }
    }

    #[test]
    fn test_parse_ref_value() {
        assert_eq!(
            "ref: refs/heads/master\n".parse::<RefValue>().unwrap(),
            RefValue::Symbolic("refs/heads/master".to_owned())
        );
        assert_eq!(
            "ce013625030ba8dba906f756967f9e9ca394464a\n"
                .parse::<RefValue>()
                .unwrap(),
            RefValue::Direct(Digest::from_str("ce013625030ba8dba906f756967f9e9ca394464a").unwrap())
        );
        assert!("not a ref\n".parse::<RefValue>().is_err());
    }
}
