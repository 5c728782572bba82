//! Pluggable on-disk storage for the term -> postings mapping.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{IndexError, Result};
use crate::index::PostingsMap;

const MAGIC: &[u8; 4] = b"IIDX";
const VERSION: u8 = 1;

/// Descriptor fields are two u32 values: term byte length, postings count.
const DESCRIPTOR_LEN: usize = 8;

/// Sanity bound on a decoded term length; anything larger marks a garbage
/// descriptor before we try to allocate for it.
const MAX_TERM_BYTES: usize = 1 << 20;

/// A binary layout for a persisted index.
///
/// Implementations must round-trip: `load` on the output of `dump` yields a
/// mapping structurally equal to the one dumped.
pub trait StoragePolicy {
    fn dump(&self, mapping: &PostingsMap, path: &Path) -> Result<()>;
    fn load(&self, path: &Path) -> Result<PostingsMap>;
}

/// Default layout: `IIDX` magic and a version byte, then one record per term.
///
/// A record is a fixed-width descriptor (term byte length and postings count,
/// both u32) followed by its payload (the UTF-8 term bytes, then the postings
/// as i32 document ids). All integers little-endian. Record order is
/// arbitrary; records repeat until end of file, so an empty index is a
/// header-only file.
pub struct BinaryPolicy;

impl StoragePolicy for BinaryPolicy {
    fn dump(&self, mapping: &PostingsMap, path: &Path) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        out.write_all(MAGIC)?;
        out.write_u8(VERSION)?;
        for (term, postings) in mapping {
            out.write_u32::<LittleEndian>(term.len() as u32)?;
            out.write_u32::<LittleEndian>(postings.len() as u32)?;
            out.write_all(term.as_bytes())?;
            for doc_id in postings {
                out.write_i32::<LittleEndian>(*doc_id)?;
            }
        }
        let file = out.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<PostingsMap> {
        let mut input = BufReader::new(File::open(path)?);

        let mut header = [0u8; 5];
        input
            .read_exact(&mut header)
            .map_err(|_| corrupt(0, "file too short for header"))?;
        if &header[..4] != MAGIC {
            return Err(corrupt(0, "bad magic, not an index file"));
        }
        if header[4] != VERSION {
            return Err(corrupt(0, format!("unsupported format version {}", header[4])));
        }

        let mut mapping = PostingsMap::new();
        let mut record = 0usize;
        loop {
            let mut descriptor = [0u8; DESCRIPTOR_LEN];
            match read_descriptor(&mut input, &mut descriptor) {
                Ok(false) => break,
                Ok(true) => {}
                Err(_) => return Err(corrupt(record, "truncated descriptor")),
            }
            let term_len = LittleEndian::read_u32(&descriptor[..4]) as usize;
            let doc_count = LittleEndian::read_u32(&descriptor[4..]) as usize;
            if term_len == 0 || term_len > MAX_TERM_BYTES {
                return Err(corrupt(record, format!("implausible term length {term_len}")));
            }

            let mut term_bytes = vec![0u8; term_len];
            input
                .read_exact(&mut term_bytes)
                .map_err(|_| corrupt(record, "payload shorter than its descriptor"))?;
            let term = String::from_utf8(term_bytes)
                .map_err(|_| corrupt(record, "term bytes are not valid UTF-8"))?;

            let mut postings = HashSet::with_capacity(doc_count.min(1 << 16));
            for _ in 0..doc_count {
                let doc_id = input
                    .read_i32::<LittleEndian>()
                    .map_err(|_| corrupt(record, "truncated postings payload"))?;
                postings.insert(doc_id);
            }
            mapping.insert(term, postings);
            record += 1;
        }
        Ok(mapping)
    }
}

/// Read a full descriptor, distinguishing clean end-of-file (no more records)
/// from truncation mid-descriptor.
fn read_descriptor<R: Read>(input: &mut R, buf: &mut [u8; DESCRIPTOR_LEN]) -> std::io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = input.read(&mut buf[filled..])?;
        if n == 0 {
            return if filled == 0 {
                Ok(false)
            } else {
                Err(std::io::ErrorKind::UnexpectedEof.into())
            };
        }
        filled += n;
    }
    Ok(true)
}

fn corrupt(record: usize, reason: impl Into<String>) -> IndexError {
    IndexError::CorruptIndex {
        record,
        reason: reason.into(),
    }
}

/// Alternative layout: a single bincode image of the whole mapping.
///
/// Exists to exercise the policy seam; it honors the same round-trip
/// guarantee with none of the record framing above.
pub struct BincodePolicy;

impl StoragePolicy for BincodePolicy {
    fn dump(&self, mapping: &PostingsMap, path: &Path) -> Result<()> {
        let bytes = bincode::serialize(mapping)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut f = File::create(path)?;
        f.write_all(&bytes)?;
        f.sync_all()?;
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<PostingsMap> {
        let mut f = File::open(path)?;
        let mut buf = Vec::new();
        f.read_to_end(&mut buf)?;
        let mapping = bincode::deserialize(&buf).map_err(|e| corrupt(0, e.to_string()))?;
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_mapping() -> PostingsMap {
        let mut mapping: PostingsMap = HashMap::new();
        mapping.insert("a_word".into(), [123, 37].into_iter().collect());
        mapping.insert("b_word".into(), [2, 37].into_iter().collect());
        mapping.insert("to".into(), [5].into_iter().collect());
        mapping
    }

    #[test]
    fn binary_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("index.bin");
        let mapping = sample_mapping();
        BinaryPolicy.dump(&mapping, &path).expect("dump");
        let loaded = BinaryPolicy.load(&path).expect("load");
        assert_eq!(mapping, loaded);
    }

    #[test]
    fn binary_round_trip_empty_mapping() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("empty.bin");
        BinaryPolicy.dump(&PostingsMap::new(), &path).expect("dump");
        let loaded = BinaryPolicy.load(&path).expect("load");
        assert!(loaded.is_empty());
    }

    #[test]
    fn bincode_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("index.bincode");
        let mapping = sample_mapping();
        BincodePolicy.dump(&mapping, &path).expect("dump");
        let loaded = BincodePolicy.load(&path).expect("load");
        assert_eq!(mapping, loaded);
    }

    #[test]
    fn rejects_bad_magic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("garbage");
        std::fs::write(&path, b"this is not an index file").expect("write");
        let err = BinaryPolicy.load(&path).unwrap_err();
        assert!(matches!(err, IndexError::CorruptIndex { record: 0, .. }));
    }

    #[test]
    fn rejects_truncated_payload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("truncated");
        BinaryPolicy.dump(&sample_mapping(), &path).expect("dump");
        let bytes = std::fs::read(&path).expect("read");
        std::fs::write(&path, &bytes[..bytes.len() - 3]).expect("rewrite");
        let err = BinaryPolicy.load(&path).unwrap_err();
        assert!(matches!(err, IndexError::CorruptIndex { .. }));
    }

    #[test]
    fn rejects_truncated_descriptor() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("short_descriptor");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.push(VERSION);
        bytes.extend_from_slice(&3u32.to_le_bytes()[..3]);
        std::fs::write(&path, &bytes).expect("write");
        let err = BinaryPolicy.load(&path).unwrap_err();
        assert!(matches!(err, IndexError::CorruptIndex { record: 0, .. }));
    }

    #[test]
    fn rejects_non_utf8_term() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad_term");
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.push(VERSION);
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&[0xff, 0xfe]);
        std::fs::write(&path, &bytes).expect("write");
        let err = BinaryPolicy.load(&path).unwrap_err();
        match err {
            IndexError::CorruptIndex { record, reason } => {
                assert_eq!(record, 0);
                assert!(reason.contains("UTF-8"));
            }
            other => panic!("expected CorruptIndex, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BinaryPolicy.load(Path::new("/nonexistent/index.bin")).unwrap_err();
        assert!(matches!(err, IndexError::Io(_)));
    }
}
