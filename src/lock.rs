use crate::Result;

use std::{
    fs::File,
    io::{ErrorKind, Write},
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};

use color_eyre::eyre::eyre;

/// Exclusive write access to a file via a sibling `<name>.lock`.
///
/// Content is written to the lock file and moved over the guarded path by [`LockedFile::commit`].
/// Dropping the guard without committing removes the lock file and leaves the target untouched.
pub struct LockedFile {
    guarded_path: PathBuf,
    lock_path: PathBuf,
    lockfile: File,
    committed: bool,
}

impl Deref for LockedFile {
    type Target = File;

    fn deref(&self) -> &Self::Target {
        &self.lockfile
    }
}
impl DerefMut for LockedFile {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.lockfile
    }
}

impl LockedFile {
    /// Returns `Ok(None)` if somebody else holds the lock.
    pub fn try_acquire<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .ok_or_else(|| eyre!("Cannot lock {}", path.display()))?;
        let mut lock_name = file_name.to_owned();
        lock_name.push(".lock");
        let lock_path = path.with_file_name(lock_name);

        match File::options()
            .write(true)
            .create_new(true)
            .open(&lock_path)
        {
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(None),
            Err(e) => Err(e.into()),
            Ok(lockfile) => Ok(Some(Self {
                guarded_path: path.to_owned(),
                lock_path,
                lockfile,
                committed: false,
            })),
        }
    }

    pub fn commit(mut self) -> Result<()> {
        self.lockfile.flush()?;
        self.lockfile.sync_all()?;
        std::fs::rename(&self.lock_path, &self.guarded_path)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for LockedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}
