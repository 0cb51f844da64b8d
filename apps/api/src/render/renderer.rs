use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::recipients::Recipient;
use crate::render::docx::DocxDocument;
use crate::render::enhance::{apply_best_effort, BodyFont, Enhancement, HeaderLogo};
use crate::render::html::render_html;
use crate::render::logo::Logo;
use crate::render::narrative::{compose, Letter};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write document package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to write document part: {0}")]
    Io(#[from] std::io::Error),
}

/// The two per-recipient output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Docx,
    Html,
}

impl OutputKind {
    pub fn extension(self) -> &'static str {
        match self {
            OutputKind::Docx => "docx",
            OutputKind::Html => "html",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            OutputKind::Docx => crate::render::docx::DOCX_MIME,
            OutputKind::Html => crate::render::html::HTML_MIME,
        }
    }
}

/// Rendered outputs for one recipient. Immutable once produced.
#[derive(Debug, Clone)]
pub struct RenderedLetter {
    pub recipient: Recipient,
    pub docx: Bytes,
    pub html: Bytes,
}

impl RenderedLetter {
    pub fn output(&self, kind: OutputKind) -> &Bytes {
        match kind {
            OutputKind::Docx => &self.docx,
            OutputKind::Html => &self.html,
        }
    }
}

/// Renders recipients into DOCX + HTML letters.
///
/// Holds only immutable settings (enhancements, logo), so one instance is shared
/// across requests behind an `Arc`.
pub struct LetterRenderer {
    enhancements: Vec<Box<dyn Enhancement>>,
    logo: Option<Logo>,
}

impl LetterRenderer {
    pub fn new(enhancements: Vec<Box<dyn Enhancement>>, logo: Option<Logo>) -> Self {
        Self { enhancements, logo }
    }

    /// Body font from config plus the header logo (configured file or bundled).
    pub fn from_config(config: &Config) -> Self {
        let logo = Logo::resolve(config.logo_path.as_deref());
        let enhancements: Vec<Box<dyn Enhancement>> = vec![
            Box::new(BodyFont {
                family: config.letter_font.clone(),
                size_pt: config.letter_font_size_pt,
            }),
            Box::new(HeaderLogo { logo: logo.clone() }),
        ];
        Self::new(enhancements, logo)
    }

    pub fn render(&self, recipient: &Recipient) -> Result<RenderedLetter, RenderError> {
        let letter = compose(recipient);
        let docx = self.render_docx(&letter)?;
        let html = render_html(&letter, self.logo.as_ref());
        Ok(RenderedLetter {
            recipient: recipient.clone(),
            docx: Bytes::from(docx),
            html: Bytes::from(html),
        })
    }

    /// Enhancement failures are absorbed here; only package serialisation can fail.
    pub fn render_docx(&self, letter: &Letter) -> Result<Vec<u8>, RenderError> {
        let mut doc = DocxDocument::from_letter(letter);
        apply_best_effort(&mut doc, &self.enhancements);
        doc.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn blyth() -> Recipient {
        Recipient {
            full_salutation: "Senator Leah Blyth\nSenator for South Australia".to_string(),
            salutation: "Dear Senator Blyth".to_string(),
            first_name: "Leah".to_string(),
            last_name: "Blyth".to_string(),
            electorate: "SA".to_string(),
            percentage_electorate: None,
        }
    }

    fn document_xml(docx: &[u8]) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(docx)).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        xml
    }

    #[test]
    fn test_render_is_byte_identical_on_repeat() {
        let renderer = LetterRenderer::from_config(&Config::default());
        let a = renderer.render(&blyth()).unwrap();
        let b = renderer.render(&blyth()).unwrap();
        assert_eq!(a.docx, b.docx);
        assert_eq!(a.html, b.html);
    }

    #[test]
    fn test_render_without_enhancements_still_succeeds() {
        let renderer = LetterRenderer::new(Vec::new(), None);
        let letter = renderer.render(&blyth()).unwrap();
        assert!(document_xml(&letter.docx).contains("Dear Senator Blyth"));
        assert!(!letter.html.is_empty());
    }

    #[test]
    fn test_failing_enhancements_do_not_abort_rendering() {
        let renderer = LetterRenderer::new(
            vec![
                Box::new(BodyFont {
                    family: String::new(),
                    size_pt: 9.0,
                }),
                Box::new(HeaderLogo { logo: None }),
            ],
            None,
        );
        let letter = renderer.render(&blyth()).unwrap();
        let xml = document_xml(&letter.docx);
        assert!(xml.contains("Many of your constituents"));
    }

    #[test]
    fn test_both_outputs_carry_salutations() {
        let renderer = LetterRenderer::from_config(&Config::default());
        let letter = renderer.render(&blyth()).unwrap();
        let xml = document_xml(&letter.docx);
        let html = String::from_utf8(letter.html.to_vec()).unwrap();
        for line in ["Senator Leah Blyth", "Senator for South Australia"] {
            assert!(xml.contains(line));
        }
        assert!(xml.contains("Dear Senator Blyth"));
        assert!(html.contains("Senator Leah Blyth\nSenator for South Australia"));
        assert!(html.contains("Dear Senator Blyth"));
    }

    #[test]
    fn test_control_characters_never_reach_outputs() {
        let renderer = LetterRenderer::from_config(&Config::default());
        let recipient = Recipient {
            full_salutation: "Ms A MP\u{b}Member for X".to_string(),
            salutation: "Dear Ms A\u{1}".to_string(),
            ..blyth()
        };
        let letter = renderer.render(&recipient).unwrap();
        let xml = document_xml(&letter.docx);
        let html = String::from_utf8(letter.html.to_vec()).unwrap();
        for text in [&xml, &html] {
            let illegal: Vec<u32> = text
                .chars()
                .filter(|c| c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
                .map(u32::from)
                .collect();
            assert!(illegal.is_empty(), "illegal characters: {illegal:?}");
        }
        assert!(xml.contains("Ms A MPMember for X"));
        assert!(xml.contains("Dear Ms A</w:t>"));
    }

    #[test]
    fn test_docx_carries_no_other_recipients_salutation() {
        let renderer = LetterRenderer::new(Vec::new(), None);
        let belyea = Recipient {
            full_salutation: "Ms Jodie Belyea MP\nMember for Dunkley".to_string(),
            salutation: "Dear Ms Belyea".to_string(),
            first_name: "Jodie".to_string(),
            last_name: "Belyea".to_string(),
            electorate: "Dunkley".to_string(),
            percentage_electorate: Some("26.18%".to_string()),
        };
        let xml_belyea = document_xml(&renderer.render(&belyea).unwrap().docx);
        let xml_blyth = document_xml(&renderer.render(&blyth()).unwrap().docx);
        for line in ["Ms Jodie Belyea MP", "Member for Dunkley", "Dear Ms Belyea"] {
            assert!(xml_belyea.contains(line));
            assert!(!xml_blyth.contains(line), "{line} leaked into Blyth letter");
        }
        for line in ["Senator Leah Blyth", "Senator for South Australia", "Dear Senator Blyth"] {
            assert!(!xml_belyea.contains(line), "{line} leaked into Belyea letter");
        }
    }

    #[test]
    fn test_output_kind_lookup() {
        let renderer = LetterRenderer::new(Vec::new(), None);
        let letter = renderer.render(&blyth()).unwrap();
        assert_eq!(letter.output(OutputKind::Docx), &letter.docx);
        assert_eq!(letter.output(OutputKind::Html), &letter.html);
        assert_eq!(OutputKind::Docx.extension(), "docx");
        assert_eq!(OutputKind::Html.mime(), "text/html");
    }
}
