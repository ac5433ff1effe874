//! Zip archive builders.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;

/// Build an in-memory zip with `files` as `(entry name, contents)` pairs.
///
/// Entry names ending in `/` become directory entries.
pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, contents) in files {
        if name.ends_with('/') {
            writer
                .add_directory(*name, options)
                .expect("zip_bytes: failed to add directory");
        } else {
            writer
                .start_file(*name, options)
                .expect("zip_bytes: failed to start file");
            writer
                .write_all(contents.as_bytes())
                .expect("zip_bytes: failed to write file");
        }
    }

    writer
        .finish()
        .expect("zip_bytes: failed to finish archive")
        .into_inner()
}

/// Write a zip archive with `files` to `path`, creating parent directories.
pub fn write_zip(path: &Path, files: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, zip_bytes(files)).unwrap();
}
