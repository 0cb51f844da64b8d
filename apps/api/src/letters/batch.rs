//! One generate run: every recipient of an upload rendered in both formats.
//!
//! Letters are keyed by `Recipient::key`. A later row with the same key replaces the
//! earlier letter but keeps the earlier position. The batch lives for one request.

use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use crate::archive::{file_name, package, ArchiveFormat, PackageError};
use crate::recipients::Recipient;
use crate::render::{LetterRenderer, OutputKind, RenderError, RenderedLetter};

/// Shown in the summary when a recipient has no percentage figure.
pub const NO_PERCENTAGE: &str = "N/A";

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterSummary {
    pub key: String,
    pub mp_name: String,
    pub electorate: String,
    pub percentage: String,
    pub docx_file: String,
    pub html_file: String,
}

#[derive(Debug, Default)]
pub struct LetterBatch {
    letters: IndexMap<String, RenderedLetter>,
}

impl LetterBatch {
    /// Renders every recipient in order. The first render failure aborts the batch.
    pub fn generate(
        recipients: &[Recipient],
        renderer: &LetterRenderer,
    ) -> Result<Self, RenderError> {
        let mut letters = IndexMap::with_capacity(recipients.len());
        for recipient in recipients {
            let letter = renderer.render(recipient)?;
            letters.insert(recipient.key(), letter);
        }
        info!(
            "Generated {} letters from {} recipients",
            letters.len(),
            recipients.len()
        );
        Ok(Self { letters })
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&RenderedLetter> {
        self.letters.get(key)
    }

    /// Single output for one recipient, with its download file name.
    pub fn file(&self, key: &str, kind: OutputKind) -> Option<(String, Bytes)> {
        let letter = self.get(key)?;
        Some((
            file_name(&letter.recipient, kind),
            letter.output(kind).clone(),
        ))
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderedLetter> {
        self.letters.values()
    }

    pub fn package(&self, format: ArchiveFormat) -> Result<Bytes, PackageError> {
        package(self.iter(), format)
    }

    pub fn summary(&self) -> Vec<LetterSummary> {
        self.letters
            .iter()
            .map(|(key, letter)| {
                let r = &letter.recipient;
                LetterSummary {
                    key: key.clone(),
                    mp_name: r.display_name(),
                    electorate: r.electorate.clone(),
                    percentage: r
                        .percentage_electorate
                        .clone()
                        .unwrap_or_else(|| NO_PERCENTAGE.to_string()),
                    docx_file: file_name(r, OutputKind::Docx),
                    html_file: file_name(r, OutputKind::Html),
                }
            })
            .collect()
    }
}
