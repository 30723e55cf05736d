//! Builders for test archives and listing pages

use std::fs;
use std::io::Write;
use std::path::Path;
use tar::{EntryType, Header};

use super::constants::*;

/// Name of the pseudo-entry carrying a GNU long file name
const GNU_LONG_LINK: &[u8] = b"././@LongLink";

#[derive(Debug, Clone)]
enum TestEntry {
    File {
        name: String,
        content: Vec<u8>,
        mode: u32,
    },
    Dir(String),
    /// Name bytes copied verbatim into the header, bypassing path checks
    RawName { name: Vec<u8>, content: Vec<u8> },
    /// Name carried in a preceding GNU long-name entry, may contain NUL
    LongName { name: Vec<u8>, content: Vec<u8> },
}

/// Fluent builder for .tar.bz2 and .tar.gz test archives
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder {
    entries: Vec<TestEntry>,
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Archive containing the default executable
    pub fn with_executable() -> Self {
        Self::new().executable(EXECUTABLE_NAME, EXECUTABLE_CONTENT)
    }

    pub fn file(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push(TestEntry::File {
            name: name.to_string(),
            content: content.to_vec(),
            mode: 0o644,
        });
        self
    }

    pub fn executable(mut self, name: &str, content: &[u8]) -> Self {
        self.entries.push(TestEntry::File {
            name: name.to_string(),
            content: content.to_vec(),
            mode: 0o755,
        });
        self
    }

    pub fn dir(mut self, name: &str) -> Self {
        self.entries.push(TestEntry::Dir(name.to_string()));
        self
    }

    pub fn raw_name_file(mut self, name: &[u8], content: &[u8]) -> Self {
        self.entries.push(TestEntry::RawName {
            name: name.to_vec(),
            content: content.to_vec(),
        });
        self
    }

    pub fn long_name_file(mut self, name: &[u8], content: &[u8]) -> Self {
        self.entries.push(TestEntry::LongName {
            name: name.to_vec(),
            content: content.to_vec(),
        });
        self
    }

    /// Uncompressed tar bytes
    pub fn tar_bytes(&self) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());

        for entry in &self.entries {
            match entry {
                TestEntry::File {
                    name,
                    content,
                    mode,
                } => {
                    let mut header = Header::new_gnu();
                    header.set_entry_type(EntryType::Regular);
                    header.set_size(content.len() as u64);
                    header.set_mode(*mode);
                    builder
                        .append_data(&mut header, name, content.as_slice())
                        .unwrap();
                }
                TestEntry::Dir(name) => {
                    let mut header = Header::new_gnu();
                    header.set_entry_type(EntryType::Directory);
                    header.set_size(0);
                    header.set_mode(0o755);
                    builder
                        .append_data(&mut header, name, std::io::empty())
                        .unwrap();
                }
                TestEntry::RawName { name, content } => {
                    let header = raw_header(name, EntryType::Regular, content.len() as u64);
                    builder.append(&header, content.as_slice()).unwrap();
                }
                TestEntry::LongName { name, content } => {
                    let mut long_name = name.clone();
                    long_name.push(0);
                    let link = raw_header(
                        GNU_LONG_LINK,
                        EntryType::GNULongName,
                        long_name.len() as u64,
                    );
                    builder.append(&link, long_name.as_slice()).unwrap();

                    let header =
                        raw_header(b"placeholder", EntryType::Regular, content.len() as u64);
                    builder.append(&header, content.as_slice()).unwrap();
                }
            }
        }

        builder.into_inner().unwrap()
    }

    pub fn build_bz2(&self) -> Vec<u8> {
        let mut encoder =
            bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        encoder.write_all(&self.tar_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    pub fn build_gz(&self) -> Vec<u8> {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(&self.tar_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    /// Write the archive to `path`, compressed according to its extension
    pub fn write_to(&self, path: &Path) {
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        let bytes = if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            self.build_gz()
        } else {
            self.build_bz2()
        };
        fs::write(path, bytes).unwrap();
    }
}

/// GNU header with `name` copied verbatim into the name field
fn raw_header(name: &[u8], entry_type: EntryType, size: u64) -> Header {
    let mut header = Header::new_gnu();
    header.as_old_mut().name[..name.len()].copy_from_slice(name);
    header.set_entry_type(entry_type);
    header.set_size(size);
    header.set_mode(0o644);
    header.set_cksum();
    header
}

/// Directory listing in the style of the snapshot server
pub fn snapshot_listing(versions: &[&str]) -> String {
    let mut html = String::from(
        "<html>\n<head><title>Index of /dailysnapshots/</title></head>\n<body>\n<pre>\n<a href=\"../\">../</a>\n",
    );
    for version in versions {
        let filename = snapshot_filename(version);
        html.push_str(&format!(
            "<a href=\"{0}\">{0}</a>                 16-Oct-2026 06:12   212M\n",
            filename
        ));
    }
    html.push_str("</pre>\n</body>\n</html>\n");
    html
}

/// Release page listing tags newest first
pub fn release_page(tags: &[&str]) -> String {
    let mut html = String::from("<html>\n<body>\n<div class=\"releases\">\n");
    for tag in tags {
        html.push_str(&format!(
            "  <h2><a href=\"/SinaC/ForgeLauncher/releases/tag/{0}\" data-view-component=\"true\" class=\"Link--primary\">{0}</a></h2>\n",
            tag
        ));
    }
    html.push_str("</div>\n</body>\n</html>\n");
    html
}
