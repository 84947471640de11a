// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::io::{Cursor, Write};

use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builds a ZIP archive in memory. Entries keep the given order.
pub fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
    zip_archive_with_dirs(&[], entries)
}

/// Like [`zip_archive`], with directory entries written first.
pub fn zip_archive_with_dirs(dirs: &[&str], entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for dir in dirs {
        writer.add_directory(*dir, options).unwrap();
    }
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
