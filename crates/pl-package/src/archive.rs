//! Zip archive creation

use crate::{PackageError, PackageResult};
use std::fs::File;
use std::io;
use std::path::Path;
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Compress the contents of `source` into a new zip file at `destination`.
///
/// Entry names are relative to `source` (the directory itself is not an
/// entry) and use `/` separators. Entries are written in sorted order.
/// Returns the number of entries written.
pub fn zip_directory(source: &Path, destination: &Path) -> PackageResult<usize> {
    let file = File::create(destination).map_err(|e| PackageError::io(destination, e))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut count = 0;
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            PackageError::io(path, io::Error::from(e))
        })?;
        let path = entry.path();
        let rel = path
            .strip_prefix(source)
            .map_err(|e| PackageError::io(path, io::Error::new(io::ErrorKind::Other, e)))?;
        let name = rel.to_string_lossy().replace('\\', "/");

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), options)
                .map_err(|e| PackageError::archive(destination, e))?;
        } else {
            zip.start_file(name, options)
                .map_err(|e| PackageError::archive(destination, e))?;
            let mut f = File::open(path).map_err(|e| PackageError::io(path, e))?;
            io::copy(&mut f, &mut zip).map_err(|e| PackageError::io(destination, e))?;
        }
        count += 1;
    }

    zip.finish()
        .map_err(|e| PackageError::archive(destination, e))?;
    log::debug!("wrote {} entries to {}", count, destination.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_zip_directory_entries() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("stage");
        std::fs::create_dir_all(source.join("include")).unwrap();
        std::fs::create_dir_all(source.join("bin")).unwrap();
        std::fs::write(source.join("include").join("pl.h"), "#pragma once\n").unwrap();
        std::fs::write(source.join("bin").join("app.so"), [0u8, 1, 2]).unwrap();

        let destination = dir.path().join("out.zip");
        let count = zip_directory(&source, &destination).unwrap();
        assert_eq!(count, 4);

        let mut archive = zip::ZipArchive::new(File::open(&destination).unwrap()).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        assert!(names.contains(&"include/".to_string()));
        assert!(names.contains(&"include/pl.h".to_string()));
        assert!(names.contains(&"bin/app.so".to_string()));

        let mut content = String::new();
        archive
            .by_name("include/pl.h")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "#pragma once\n");
    }

    #[test]
    fn test_missing_destination_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = zip_directory(dir.path(), &dir.path().join("no").join("out.zip")).unwrap_err();
        assert!(matches!(err, PackageError::IoError { .. }));
    }
}
