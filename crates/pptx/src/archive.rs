//! ZIP container codec: reads a package into memory and writes it back.

use pagenum_core::{Compression, Error, Package, PackageEntry, Result};
use std::io::{Read, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Upper bound on the buffer reserved up front for one entry.
///
/// The declared size comes from the archive and is not trusted.
const MAX_PREALLOC: u64 = 16 * 1024 * 1024;

/// Read every entry of a ZIP container, in archive order.
///
/// Directory entries become empty placeholders. Fails with
/// [`Error::ArchiveFormat`] for anything that is not a readable container,
/// including duplicate entry names and encrypted entries.
pub fn extract<R: Read + Seek>(reader: R) -> Result<Package> {
    let mut archive = ZipArchive::new(reader)
        .map_err(|e| Error::ArchiveFormat(format!("Failed to open ZIP: {}", e)))?;

    let mut package = Package::new();

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| Error::ArchiveFormat(format!("Failed to read entry {}: {}", i, e)))?;

        let raw_name = file.name().to_string();
        let path = raw_name.trim_end_matches('/');
        if path.is_empty() {
            return Err(Error::ArchiveFormat(format!("Entry {} has an empty name", i)));
        }

        let entry = if file.is_dir() {
            PackageEntry::directory(path)
        } else {
            let mut data = Vec::with_capacity(file.size().min(MAX_PREALLOC) as usize);
            file.read_to_end(&mut data)
                .map_err(|e| Error::ArchiveFormat(format!("Failed to read '{}': {}", raw_name, e)))?;

            let compression = match file.compression() {
                CompressionMethod::Stored => Compression::Stored,
                _ => Compression::Deflated,
            };
            PackageEntry::file(path, data, compression)
        };

        package
            .insert(entry)
            .map_err(|dup| Error::ArchiveFormat(format!("Duplicate entry '{}'", dup.path)))?;
    }

    log::debug!("Extracted {} entries", package.len());

    Ok(package)
}

/// Write a package as a ZIP container, in package order.
///
/// Returns the writer once the central directory has been written.
pub fn pack<W: Write + Seek>(package: &Package, writer: W) -> Result<W> {
    let mut zip = ZipWriter::new(writer);

    for entry in package.entries() {
        if entry.is_dir() {
            zip.add_directory(format!("{}/", entry.path), FileOptions::default())
                .map_err(|e| pack_error(&entry.path, e))?;
            continue;
        }

        let method = match entry.compression {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        };
        let options = FileOptions::default()
            .compression_method(method)
            .large_file(entry.data.len() as u64 >= u32::MAX as u64);

        zip.start_file(entry.path.as_str(), options)
            .map_err(|e| pack_error(&entry.path, e))?;
        zip.write_all(&entry.data)
            .map_err(|e| Error::Unexpected(format!("Failed to write '{}': {}", entry.path, e)))?;
    }

    zip.finish()
        .map_err(|e| Error::Unexpected(format!("Failed to finish ZIP: {}", e)))
}

fn pack_error(path: &str, e: zip::result::ZipError) -> Error {
    Error::Unexpected(format!("Failed to add '{}' to ZIP: {}", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{read_zip, ZipBuilder};
    use std::io::Cursor;

    fn sample() -> Vec<u8> {
        ZipBuilder::new()
            .file("[Content_Types].xml", "<Types/>")
            .dir("_rels/")
            .file("_rels/.rels", "<Relationships/>")
            .dir("ppt/")
            .stored("ppt/media/image1.png", [0x89u8, 0x50, 0x4E, 0x47, 0, 1, 2, 3])
            .file("ppt/slides/slide1.xml", "<p:sld/>")
            .finish()
    }

    #[test]
    fn test_extract_keeps_order_and_directories() {
        let pkg = extract(Cursor::new(sample())).unwrap();

        let paths: Vec<_> = pkg.paths().collect();
        assert_eq!(
            paths,
            vec![
                "[Content_Types].xml",
                "_rels",
                "_rels/.rels",
                "ppt",
                "ppt/media/image1.png",
                "ppt/slides/slide1.xml",
            ]
        );
        assert!(pkg.get("ppt").unwrap().is_dir());
        assert!(pkg.get("ppt").unwrap().data.is_empty());
        assert_eq!(pkg.get("_rels/.rels").unwrap().data, b"<Relationships/>");
    }

    #[test]
    fn test_pack_is_lossless() {
        let input = sample();
        let pkg = extract(Cursor::new(input.clone())).unwrap();
        let output = pack(&pkg, Cursor::new(Vec::new())).unwrap().into_inner();

        assert_eq!(read_zip(&output), read_zip(&input));
    }

    #[test]
    fn test_pack_writes_directories_with_trailing_slash() {
        let pkg = extract(Cursor::new(sample())).unwrap();
        let output = pack(&pkg, Cursor::new(Vec::new())).unwrap().into_inner();

        let mut archive = ZipArchive::new(Cursor::new(output)).unwrap();
        let dir = archive.by_name("ppt/").unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_stored_entries_stay_stored() {
        let input = ZipBuilder::new()
            .stored("mimetype", "application/test")
            .file("content.xml", "<doc/>")
            .finish();
        let pkg = extract(Cursor::new(input)).unwrap();
        assert_eq!(pkg.get("mimetype").unwrap().compression, Compression::Stored);
        assert_eq!(pkg.get("content.xml").unwrap().compression, Compression::Deflated);

        let output = pack(&pkg, Cursor::new(Vec::new())).unwrap().into_inner();
        let mut archive = ZipArchive::new(Cursor::new(output)).unwrap();
        assert_eq!(archive.by_name("mimetype").unwrap().compression(), CompressionMethod::Stored);
        assert_eq!(
            archive.by_name("content.xml").unwrap().compression(),
            CompressionMethod::Deflated
        );
    }

    #[test]
    fn test_extract_rejects_non_zip() {
        let err = extract(Cursor::new(b"definitely not a zip file".to_vec())).unwrap_err();
        assert!(matches!(err, Error::ArchiveFormat(_)));
    }

    #[test]
    fn test_extract_rejects_truncated_archive() {
        let mut input = sample();
        input.truncate(input.len() / 2);
        let err = extract(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, Error::ArchiveFormat(_)));
    }

    #[test]
    fn test_empty_package_round_trips() {
        let output = pack(&Package::new(), Cursor::new(Vec::new())).unwrap().into_inner();
        let pkg = extract(Cursor::new(output)).unwrap();
        assert!(pkg.is_empty());
    }

    #[test]
    fn test_extract_rejects_duplicate_entries() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for data in [b"one", b"two"] {
            writer.start_file("a.xml", FileOptions::default()).unwrap();
            writer.write_all(data).unwrap();
        }
        let input = writer.finish().unwrap().into_inner();

        match extract(Cursor::new(input)) {
            Err(Error::ArchiveFormat(message)) => assert!(message.contains("a.xml"), "{}", message),
            other => panic!("expected ArchiveFormat, got {:?}", other.map(|p| p.len())),
        }
    }

    #[test]
    fn test_extract_rejects_file_and_directory_with_same_path() {
        let input = ZipBuilder::new().file("a", "data").dir("a/").finish();

        let err = extract(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, Error::ArchiveFormat(_)));
    }

    #[test]
    fn test_extract_rejects_encrypted_entry() {
        let mut input = ZipBuilder::new().stored("secret.xml", "<hidden/>").finish();

        // Set general purpose bit 0 (encrypted) in the local and central headers.
        let local = find(&input, b"PK\x03\x04");
        input[local + 6] |= 1;
        let central = find(&input, b"PK\x01\x02");
        input[central + 8] |= 1;

        let err = extract(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, Error::ArchiveFormat(_)));
    }

    fn find(haystack: &[u8], signature: &[u8]) -> usize {
        haystack
            .windows(signature.len())
            .position(|w| w == signature)
            .unwrap()
    }
}
