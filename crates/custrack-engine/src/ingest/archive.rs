//! In-memory zip extraction

use custrack_core::errors::CustrackError;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};

/// Archive members indexed by file name without directories
///
/// When two members share a base name the first one in archive order wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedArchive {
    members: BTreeMap<String, Vec<u8>>,
}

impl ExtractedArchive {
    /// Unpack every file member of `bytes`
    ///
    /// # Errors
    ///
    /// - `ArchiveTooLarge` when the archive, or a member's declared
    ///   uncompressed size, exceeds `max_bytes`
    /// - `ArchiveUnreadable` when the bytes are not a readable zip
    pub fn extract(name: &str, bytes: &[u8], max_bytes: u64) -> Result<Self, CustrackError> {
        let size = bytes.len() as u64;
        if size > max_bytes {
            return Err(CustrackError::ArchiveTooLarge {
                name: name.to_string(),
                size,
                limit: max_bytes,
            });
        }

        let unreadable = |reason: String| CustrackError::ArchiveUnreadable {
            name: name.to_string(),
            reason,
        };

        let mut archive =
            zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| unreadable(e.to_string()))?;

        let mut members = BTreeMap::new();
        for index in 0..archive.len() {
            let mut file = archive.by_index(index).map_err(|e| unreadable(e.to_string()))?;
            if file.is_dir() {
                continue;
            }
            if file.size() > max_bytes {
                return Err(CustrackError::ArchiveTooLarge {
                    name: file.name().to_string(),
                    size: file.size(),
                    limit: max_bytes,
                });
            }

            let base = basename(file.name()).to_string();
            if base.is_empty() || members.contains_key(&base) {
                tracing::debug!(member = file.name(), "skipping archive member");
                continue;
            }

            let member = file.name().to_string();
            let declared = file.size();
            let content = read_bounded(&mut file, &member, declared, max_bytes)
                .map_err(|e| match e {
                    BoundedReadError::TooLarge(size) => CustrackError::ArchiveTooLarge {
                        name: member.clone(),
                        size,
                        limit: max_bytes,
                    },
                    BoundedReadError::Io(reason) => unreadable(format!("{}: {}", member, reason)),
                })?;
            members.insert(base, content);
        }

        tracing::debug!(archive = name, member_count = members.len(), "archive extracted");
        Ok(Self { members })
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.members.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum BoundedReadError {
    /// Bytes read before giving up (always `max_bytes + 1`)
    TooLarge(u64),
    Io(String),
}

// Headers can under-declare a member's size, so the read itself is capped
fn read_bounded<R: Read>(
    reader: R,
    member: &str,
    declared: u64,
    max_bytes: u64,
) -> Result<Vec<u8>, BoundedReadError> {
    let mut content = Vec::with_capacity(declared.min(max_bytes) as usize);
    reader
        .take(max_bytes.saturating_add(1))
        .read_to_end(&mut content)
        .map_err(|e| BoundedReadError::Io(e.to_string()))?;
    let read = content.len() as u64;
    if read > max_bytes {
        tracing::debug!(member, declared, read, "archive member exceeds its declared size");
        return Err(BoundedReadError::TooLarge(read));
    }
    Ok(content)
}

fn basename(path: &str) -> &str {
    path.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build_zip(files: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in files {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_members_indexed_by_basename() {
        let bytes = build_zip(&[
            ("packet/support_packet.yaml", "license_to: Acme"),
            ("packet/nested/plugins.json", "{}"),
        ]);
        let archive = ExtractedArchive::extract("p.zip", &bytes, 1 << 20).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.get("support_packet.yaml"), Some(&b"license_to: Acme"[..]));
        assert!(archive.get("plugins.json").is_some());
    }

    #[test]
    fn test_first_duplicate_wins() {
        let bytes = build_zip(&[("a/x.txt", "first"), ("b/x.txt", "second")]);
        let archive = ExtractedArchive::extract("p.zip", &bytes, 1 << 20).unwrap();
        assert_eq!(archive.get("x.txt"), Some(&b"first"[..]));
    }

    #[test]
    fn test_garbage_is_unreadable() {
        let err = ExtractedArchive::extract("bad.zip", b"not a zip", 1 << 20).unwrap_err();
        assert!(matches!(err, CustrackError::ArchiveUnreadable { .. }));
    }

    #[test]
    fn test_oversized_archive_rejected() {
        let bytes = build_zip(&[("x.txt", "hello")]);
        let err = ExtractedArchive::extract("big.zip", &bytes, 4).unwrap_err();
        assert!(matches!(err, CustrackError::ArchiveTooLarge { limit: 4, .. }));
    }

    #[test]
    fn test_member_read_is_capped_past_declared_size() {
        // header claims 4 bytes, the stream yields 64
        let stream = Cursor::new(vec![b'a'; 64]);
        let err = read_bounded(stream, "x.txt", 4, 16).unwrap_err();
        assert_eq!(err, BoundedReadError::TooLarge(17));
    }

    #[test]
    fn test_member_read_within_limit() {
        let content = read_bounded(Cursor::new(b"hello".to_vec()), "x.txt", 5, 5).unwrap();
        assert_eq!(content, b"hello");
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename("a/b/c.json"), "c.json");
        assert_eq!(basename("a\\c.json"), "c.json");
        assert_eq!(basename("c.json"), "c.json");
        assert_eq!(basename("dir/"), "");
    }
}
