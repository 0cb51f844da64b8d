//! Bundles rendered letters into a single zip, in one pass over the batch.
//!
//! Entry names come from `naming::file_name`. Two recipients whose sanitised names
//! collide share one entry: the later letter replaces the earlier one.

use std::io::{Cursor, Write};

use bytes::Bytes;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use zip::ZipWriter;

use crate::archive::naming::file_name;
use crate::render::{zip_entry_options, OutputKind, RenderedLetter};

pub const ARCHIVE_MIME: &str = "application/zip";

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to write archive entry: {0}")]
    Io(#[from] std::io::Error),
}

/// Which formats go into the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    Docx,
    Html,
    #[default]
    Both,
}

impl ArchiveFormat {
    pub const ALL: [ArchiveFormat; 3] = [
        ArchiveFormat::Docx,
        ArchiveFormat::Html,
        ArchiveFormat::Both,
    ];

    /// Fixed download name for this archive variant.
    pub fn archive_name(self) -> &'static str {
        match self {
            ArchiveFormat::Docx => "mp_care_index_letters_docx.zip",
            ArchiveFormat::Html => "mp_care_index_letters_html.zip",
            ArchiveFormat::Both => "mp_care_index_letters_all.zip",
        }
    }

    pub fn kinds(self) -> &'static [OutputKind] {
        match self {
            ArchiveFormat::Docx => &[OutputKind::Docx],
            ArchiveFormat::Html => &[OutputKind::Html],
            ArchiveFormat::Both => &[OutputKind::Docx, OutputKind::Html],
        }
    }
}

/// Writes the selected outputs of every letter into one zip archive.
pub fn package<'a>(
    letters: impl IntoIterator<Item = &'a RenderedLetter>,
    format: ArchiveFormat,
) -> Result<Bytes, PackageError> {
    let mut entries: IndexMap<String, &Bytes> = IndexMap::new();
    for letter in letters {
        for &kind in format.kinds() {
            entries.insert(file_name(&letter.recipient, kind), letter.output(kind));
        }
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in &entries {
        zip.start_file(name.as_str(), zip_entry_options())?;
        zip.write_all(&data[..])?;
    }
    let bytes = zip.finish()?.into_inner();

    debug!(
        "Packaged {} entries ({:?}) into {} bytes",
        entries.len(),
        format,
        bytes.len()
    );
    Ok(Bytes::from(bytes))
}
