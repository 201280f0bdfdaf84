use std::io::{ErrorKind, Write};

use camino::{Utf8Path, Utf8PathBuf};
use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use tempfile::NamedTempFile;

use crate::digest::Digest;
use crate::error::{ObjectError, ObjectResult};
use crate::kind::ObjectKind;
use crate::object::Object;

/// The loose object store: one zlib-compressed file per object under
/// `objects/<first two hex digits>/<remaining 38>`.
pub struct Database {
    pub database_root: Utf8PathBuf,
}

impl Database {
    pub fn new(git_folder: impl AsRef<Utf8Path>) -> Self {
        Self {
            database_root: git_folder.as_ref().join("objects"),
        }
    }

    /// Compress and store an object, returning its digest.
    ///
    /// The file is written to a temporary name in the fan-out directory and renamed into place,
    /// so readers never observe a partial object. Storing an object that already exists is a
    /// no-op.
    pub fn write(&self, obj: &Object) -> ObjectResult<Digest> {
        self.write_framed(&obj.framed())
    }

    /// Store bytes that are already framed, exactly as given.
    pub fn write_framed(&self, content: &[u8]) -> ObjectResult<Digest> {
        let oid = Digest::new(content);

        let object_path = self.object_path(&oid);
        if object_path.exists() {
            return Ok(oid);
        }

        let dirname = self.database_root.join(&oid.to_hex()[..2]);
        std::fs::create_dir_all(&dirname)?;

        let temp = tempfile::Builder::new()
            .prefix("tmp_obj_")
            .tempfile_in(&dirname)?;

        let mut e = ZlibEncoder::new(temp, Compression::default());
        e.write_all(content)?;
        let temp: NamedTempFile = e.finish()?;

        temp.persist(&object_path).map_err(|e| e.error)?;

        Ok(oid)
    }

    /// Load and parse an object. With `expected` set, an object of any other kind is an error.
    pub fn read(&self, oid: &Digest, expected: Option<ObjectKind>) -> ObjectResult<Object> {
        let framed = self.read_framed(oid)?;
        let object = Object::decode(&framed).map_err(|e| match e {
            ObjectError::MalformedHeader(_)
            | ObjectError::MalformedLength { .. }
            | ObjectError::UnknownKind(_) => ObjectError::CorruptCompressedData {
                digest: *oid,
                reason: e.to_string(),
            },
            e => e,
        })?;

        if let Some(expected) = expected {
            if expected != object.kind() {
                return Err(ObjectError::KindMismatch {
                    digest: *oid,
                    expected,
                    found: object.kind(),
                });
            }
        }

        Ok(object)
    }

    /// The decompressed, still framed, bytes of an object.
    ///
    /// Fails with [`ObjectError::CorruptCompressedData`] if the stream is damaged or the content
    /// does not hash back to `oid`.
    pub fn read_framed(&self, oid: &Digest) -> ObjectResult<Vec<u8>> {
        let object_path = self.object_path(oid);

        let compressed = match std::fs::read(&object_path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(ObjectError::MissingObject(*oid)),
            Err(e) => return Err(e.into()),
        };

        let corrupt = |reason: String| ObjectError::CorruptCompressedData {
            digest: *oid,
            reason,
        };

        let framed = inflate(&compressed).map_err(corrupt)?;
        if Digest::new(&framed) != *oid {
            return Err(corrupt("content does not match its digest".to_owned()));
        }

        Ok(framed)
    }

    pub fn exists(&self, oid: &Digest) -> bool {
        self.object_path(oid).is_file()
    }

    pub fn object_path(&self, oid: &Digest) -> Utf8PathBuf {
        let mut x = self.database_root.to_owned();
        let oid = oid.to_hex();
        let (prefix, suffix) = oid.split_at(2);
        x.push(prefix);
        x.push(suffix);
        x
    }
}

/// Inflate a complete zlib stream. A stream that ends before its trailer is an error, rather than
/// a short read.
fn inflate(compressed: &[u8]) -> Result<Vec<u8>, String> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(compressed.len().saturating_mul(2).max(64));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }

        let before = (inflater.total_in(), inflater.total_out());
        let input = &compressed[inflater.total_in() as usize..];

        match inflater.decompress_vec(input, &mut out, FlushDecompress::None) {
            Ok(Status::StreamEnd) => return Ok(out),
            Ok(Status::Ok | Status::BufError) => {
                if (inflater.total_in(), inflater.total_out()) == before {
                    return Err("unexpected end of compressed stream".to_owned());
                }
            }
            Err(e) => return Err(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::str::FromStr;

    use flate2::read::ZlibDecoder;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::filemode::FileMode;
    use crate::object::tree::TreeEntry;
    use crate::object::{frame, Blob, Commit, Tag, Tree};

    fn database(dir: &TempDir) -> Database {
        Database::new(Utf8Path::from_path(dir.path()).unwrap())
    }

    fn hello() -> Object {
        Object::Blob(Blob::from(&b"hello\n"[..]))
    }

    #[test]
    fn test_object_path_layout() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let oid = Digest::from_str("ce013625030ba8dba906f756967f9e9ca394464a").unwrap();

        let path = db.object_path(&oid);
        assert!(path.ends_with("objects/ce/013625030ba8dba906f756967f9e9ca394464a"));
    }

    #[test]
    fn test_write_stores_compressed_framed_bytes() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        let oid = db.write(&hello()).unwrap();
        assert_eq!(oid.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");

        let compressed = std::fs::read(db.object_path(&oid)).unwrap();
        let mut inflated = Vec::new();
        ZlibDecoder::new(&*compressed)
            .read_to_end(&mut inflated)
            .unwrap();
        assert_eq!(inflated, b"blob 6\0hello\n");
    }

    #[test]
    fn test_write_leaves_no_temporary_files() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        let oid = db.write(&hello()).unwrap();
        let fanout = db.object_path(&oid).parent().unwrap().to_owned();
        let names = std::fs::read_dir(fanout)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(names, ["013625030ba8dba906f756967f9e9ca394464a"]);
    }

    #[test]
    fn test_write_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        let first = db.write(&hello()).unwrap();
        let bytes = std::fs::read(db.object_path(&first)).unwrap();
        let second = db.write(&hello()).unwrap();

        assert_eq!(first, second);
        assert_eq!(std::fs::read(db.object_path(&second)).unwrap(), bytes);
    }

    #[test]
    fn test_read_round_trips_every_kind() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        let blob_id = db.write(&hello()).unwrap();
        let tree = Object::Tree(Tree::new(vec![TreeEntry::new(
            FileMode::REGULAR,
            "hello.txt",
            blob_id,
        )]));
        let tree_id = db.write(&tree).unwrap();
        let commit = Object::Commit(Commit::new(
            tree_id,
            vec![],
            "A <a@x> 0 +0000",
            "A <a@x> 0 +0000",
            "init\n",
        ));
        let commit_id = db.write(&commit).unwrap();
        let tag = Object::Tag(Tag::new(
            commit_id,
            ObjectKind::Commit,
            "v1",
            "A <a@x> 0 +0000",
            "first\n",
        ));
        let tag_id = db.write(&tag).unwrap();

        assert_eq!(db.read(&blob_id, None).unwrap(), hello());
        assert_eq!(db.read(&tree_id, Some(ObjectKind::Tree)).unwrap(), tree);
        assert_eq!(db.read(&commit_id, Some(ObjectKind::Commit)).unwrap(), commit);
        assert_eq!(db.read(&tag_id, None).unwrap(), tag);
    }

    #[test]
    fn test_write_framed_stores_bytes_verbatim() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        // A padded mode is valid, but not what `Tree::encode` would produce.
        let mut payload = b"040000 dir\0".to_vec();
        payload.extend_from_slice(&[3; 20]);
        let framed = frame(ObjectKind::Tree, &payload);

        let oid = db.write_framed(&framed).unwrap();
        assert_eq!(oid, Digest::new(&framed));
        assert_eq!(db.read_framed(&oid).unwrap(), framed);
        assert!(matches!(db.read(&oid, Some(ObjectKind::Tree)), Ok(Object::Tree(_))));
    }

    #[test]
    fn test_bad_frame_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        let framed = b"blob 02\0hi";
        let oid = db.write_framed(framed).unwrap();
        assert!(matches!(
            db.read(&oid, None),
            Err(ObjectError::CorruptCompressedData { .. })
        ));
    }

    #[test]
    fn test_missing_object() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);

        let oid = Digest([0x42; 20]);
        assert!(!db.exists(&oid));
        assert!(matches!(
            db.read(&oid, None),
            Err(ObjectError::MissingObject(missing)) if missing == oid
        ));
    }

    #[test]
    fn test_kind_mismatch() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let oid = db.write(&hello()).unwrap();

        assert!(matches!(
            db.read(&oid, Some(ObjectKind::Commit)),
            Err(ObjectError::KindMismatch {
                expected: ObjectKind::Commit,
                found: ObjectKind::Blob,
                ..
            })
        ));
    }

    #[test]
    fn test_truncated_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let oid = db
            .write(&Object::Blob(Blob::new(b"some longer content\n".repeat(50))))
            .unwrap();

        let path = db.object_path(&oid);
        let compressed = std::fs::read(&path).unwrap();
        for len in [0, 1, compressed.len() / 2, compressed.len() - 1] {
            std::fs::write(&path, &compressed[..len]).unwrap();
            assert!(
                matches!(
                    db.read(&oid, None),
                    Err(ObjectError::CorruptCompressedData { .. })
                ),
                "truncated to {len} bytes"
            );
        }
    }

    #[test]
    fn test_garbage_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let oid = db.write(&hello()).unwrap();

        std::fs::write(db.object_path(&oid), b"definitely not zlib").unwrap();
        assert!(matches!(
            db.read(&oid, None),
            Err(ObjectError::CorruptCompressedData { .. })
        ));
    }

    #[test]
    fn test_content_under_wrong_name_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let db = database(&dir);
        let oid = db.write(&hello()).unwrap();

        let other = Digest([0x11; 20]);
        std::fs::create_dir_all(db.object_path(&other).parent().unwrap()).unwrap();
        std::fs::copy(db.object_path(&oid), db.object_path(&other)).unwrap();

        assert!(matches!(
            db.read(&other, None),
            Err(ObjectError::CorruptCompressedData { .. })
        ));
    }
}
