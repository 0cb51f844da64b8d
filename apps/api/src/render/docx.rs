//! DOCX writer. Serialises a `Letter` as an Office Open XML word-processing package.
//!
//! The package is a zip of hand-built XML parts. Every entry is written with the
//! fixed DOS epoch timestamp, so rendering the same letter twice gives identical bytes.
//!
//! Parts: `[Content_Types].xml`, `_rels/.rels`, `word/document.xml`,
//! `word/styles.xml`, `word/numbering.xml`, `word/header1.xml`, `word/footer1.xml`,
//! and, when a logo is set, `word/_rels/header1.xml.rels` + `word/media/logo.png`.

use std::io::{Cursor, Write};

use zip::ZipWriter;

use crate::render::logo::Logo;
use crate::render::narrative::{Block, Letter, Run};
use crate::render::{escape_markup, zip_entry_options, RenderError};

pub const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Header logo width: 1.25 inches in EMU (914400 per inch).
const LOGO_WIDTH_EMU: u64 = 1_143_000;
/// Attachment note size: 8pt, in half-points.
const ATTACHMENT_SIZE_HALF_POINTS: u32 = 16;
/// Blank lines left for the handwritten signature and before the attachment note.
const SIGNATURE_GAP_LINES: usize = 3;
const LIST_BULLET_STYLE: &str = "ListBullet";

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Body font applied to the `Normal` style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyFontSpec {
    pub family: String,
    pub size_half_points: u32,
}

/// An in-memory DOCX: serialised body paragraphs plus the optional style parts.
#[derive(Debug, Default)]
pub struct DocxDocument {
    paragraphs: Vec<String>,
    body_font: Option<BodyFontSpec>,
    header_logo: Option<Logo>,
    footer_note: Option<String>,
}

impl DocxDocument {
    /// Lays out the letter blocks as Word paragraphs.
    pub fn from_letter(letter: &Letter) -> Self {
        let mut doc = Self::default();
        for block in &letter.blocks {
            match block {
                Block::Date(date) => doc.push(None, &[Run::bold(*date)], None),
                Block::Address(text) => doc.push(None, &[Run::plain(text.as_str())], None),
                Block::Greeting(text) => doc.push(None, &[Run::bold(text.as_str())], None),
                Block::Heading(text) => doc.push(None, &[Run::bold(*text)], None),
                Block::Paragraph(runs) => doc.push(None, runs, None),
                Block::Evidence(bullets) => {
                    for bullet in bullets {
                        doc.push(Some(LIST_BULLET_STYLE), &bullet.runs(), None);
                    }
                    doc.push_blank(1);
                }
                Block::SignOff {
                    valediction,
                    name,
                    title,
                } => {
                    doc.push(None, &[Run::bold(*valediction)], None);
                    doc.push_blank(SIGNATURE_GAP_LINES);
                    doc.push(None, &[Run::bold(*name)], None);
                    doc.push(None, &[Run::plain(*title)], None);
                    doc.push_blank(SIGNATURE_GAP_LINES);
                }
                Block::Attachment(note) => {
                    doc.push(
                        None,
                        &[Run::italic(*note)],
                        Some(ATTACHMENT_SIZE_HALF_POINTS),
                    );
                    doc.footer_note = Some(note.to_string());
                }
            }
        }
        doc
    }

    pub fn set_body_font(&mut self, font: BodyFontSpec) {
        self.body_font = Some(font);
    }

    pub fn set_header_logo(&mut self, logo: Logo) {
        self.header_logo = Some(logo);
    }

    #[cfg(test)]
    pub fn body_font(&self) -> Option<&BodyFontSpec> {
        self.body_font.as_ref()
    }

    #[cfg(test)]
    pub fn header_logo(&self) -> Option<&Logo> {
        self.header_logo.as_ref()
    }

    fn push(&mut self, style: Option<&str>, runs: &[Run], size: Option<u32>) {
        self.paragraphs.push(paragraph_xml(style, runs, size));
    }

    fn push_blank(&mut self, count: usize) {
        for _ in 0..count {
            self.paragraphs.push("<w:p/>".to_string());
        }
    }

    /// Zips all parts into `.docx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RenderError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        write_part(&mut zip, "[Content_Types].xml", CONTENT_TYPES_XML.as_bytes())?;
        write_part(&mut zip, "_rels/.rels", PACKAGE_RELS_XML.as_bytes())?;
        write_part(
            &mut zip,
            "word/_rels/document.xml.rels",
            document_rels_xml().as_bytes(),
        )?;
        write_part(&mut zip, "word/document.xml", self.document_xml().as_bytes())?;
        write_part(&mut zip, "word/styles.xml", self.styles_xml().as_bytes())?;
        write_part(&mut zip, "word/numbering.xml", numbering_xml().as_bytes())?;
        write_part(&mut zip, "word/header1.xml", self.header_xml().as_bytes())?;
        write_part(&mut zip, "word/footer1.xml", self.footer_xml().as_bytes())?;
        if let Some(logo) = &self.header_logo {
            write_part(
                &mut zip,
                "word/_rels/header1.xml.rels",
                header_rels_xml().as_bytes(),
            )?;
            write_part(&mut zip, "word/media/logo.png", logo.png())?;
        }

        Ok(zip.finish()?.into_inner())
    }

    fn document_xml(&self) -> String {
        let mut xml = format!(
            r#"{XML_DECL}<w:document xmlns:w="{NS_W}" xmlns:r="{NS_R}"><w:body>"#
        );
        for p in &self.paragraphs {
            xml.push_str(p);
        }
        // A4, 1" margins, header/footer references rId3/rId4.
        xml.push_str(concat!(
            r#"<w:sectPr><w:headerReference w:type="default" r:id="rId3"/>"#,
            r#"<w:footerReference w:type="default" r:id="rId4"/>"#,
            r#"<w:pgSz w:w="11906" w:h="16838"/>"#,
            r#"<w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="708" w:footer="708" w:gutter="0"/>"#,
            r#"</w:sectPr></w:body></w:document>"#,
        ));
        xml
    }

    fn styles_xml(&self) -> String {
        let font_props = match &self.body_font {
            Some(font) => {
                let family = escape_markup(&font.family);
                let size = font.size_half_points;
                format!(
                    r#"<w:rPr><w:rFonts w:ascii="{family}" w:hAnsi="{family}" w:eastAsia="{family}" w:cs="{family}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr>"#
                )
            }
            None => String::new(),
        };
        format!(
            concat!(
                r#"{decl}<w:styles xmlns:w="{ns}">"#,
                r#"<w:docDefaults><w:rPrDefault>{font}</w:rPrDefault>"#,
                r#"<w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>"#,
                r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/>{font}</w:style>"#,
                r#"<w:style w:type="paragraph" w:styleId="{list}"><w:name w:val="List Bullet"/><w:basedOn w:val="Normal"/>"#,
                r#"<w:pPr><w:numPr><w:numId w:val="1"/></w:numPr><w:contextualSpacing/></w:pPr></w:style>"#,
                r#"</w:styles>"#,
            ),
            decl = XML_DECL,
            ns = NS_W,
            font = font_props,
            list = LIST_BULLET_STYLE,
        )
    }

    fn header_xml(&self) -> String {
        let drawing = match &self.header_logo {
            Some(logo) => logo_drawing_xml(logo),
            None => String::new(),
        };
        format!(
            concat!(
                r#"{decl}<w:hdr xmlns:w="{w}" xmlns:r="{r}" "#,
                r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
                r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
                r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
                r#"<w:p><w:pPr><w:jc w:val="right"/></w:pPr>{drawing}</w:p></w:hdr>"#,
            ),
            decl = XML_DECL,
            w = NS_W,
            r = NS_R,
            drawing = drawing,
        )
    }

    fn footer_xml(&self) -> String {
        let note = match &self.footer_note {
            Some(note) => run_xml(&Run::italic(note.as_str()), Some(ATTACHMENT_SIZE_HALF_POINTS)),
            None => String::new(),
        };
        format!(r#"{XML_DECL}<w:ftr xmlns:w="{NS_W}"><w:p>{note}</w:p></w:ftr>"#)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// XML fragments
// ────────────────────────────────────────────────────────────────────────────

fn paragraph_xml(style: Option<&str>, runs: &[Run], size: Option<u32>) -> String {
    let mut xml = String::from("<w:p>");
    if let Some(style) = style {
        xml.push_str(&format!(r#"<w:pPr><w:pStyle w:val="{style}"/></w:pPr>"#));
    }
    for run in runs {
        xml.push_str(&run_xml(run, size));
    }
    xml.push_str("</w:p>");
    xml
}

/// One `<w:r>`; `\n` in the text becomes `<w:br/>`.
fn run_xml(run: &Run, size: Option<u32>) -> String {
    let mut props = String::new();
    if run.bold {
        props.push_str("<w:b/>");
    }
    if run.italic {
        props.push_str("<w:i/>");
    }
    if let Some(size) = size {
        props.push_str(&format!(
            r#"<w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#
        ));
    }

    let mut xml = String::from("<w:r>");
    if !props.is_empty() {
        xml.push_str("<w:rPr>");
        xml.push_str(&props);
        xml.push_str("</w:rPr>");
    }
    for (i, line) in run.text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        if !line.is_empty() {
            xml.push_str(r#"<w:t xml:space="preserve">"#);
            xml.push_str(&escape_markup(line));
            xml.push_str("</w:t>");
        }
    }
    xml.push_str("</w:r>");
    xml
}

fn logo_drawing_xml(logo: &Logo) -> String {
    let cx = LOGO_WIDTH_EMU;
    let cy = logo.scaled_height(LOGO_WIDTH_EMU);
    format!(
        concat!(
            r#"<w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="1" name="Logo"/>"#,
            r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic><pic:nvPicPr><pic:cNvPr id="0" name="logo.png"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="rId1"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic>"#,
            r#"</a:graphicData></a:graphic></wp:inline></w:drawing></w:r>"#,
        ),
        cx = cx,
        cy = cy,
    )
}

const CONTENT_TYPES_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Default Extension="png" ContentType="image/png"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"<Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>"#,
    r#"<Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/>"#,
    r#"<Override PartName="/word/header1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/>"#,
    r#"<Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>"#,
    r#"</Types>"#,
);

const PACKAGE_RELS_XML: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#,
);

fn document_rels_xml() -> String {
    format!(
        concat!(
            r#"{decl}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="{base}/styles" Target="styles.xml"/>"#,
            r#"<Relationship Id="rId2" Type="{base}/numbering" Target="numbering.xml"/>"#,
            r#"<Relationship Id="rId3" Type="{base}/header" Target="header1.xml"/>"#,
            r#"<Relationship Id="rId4" Type="{base}/footer" Target="footer1.xml"/>"#,
            r#"</Relationships>"#,
        ),
        decl = XML_DECL,
        base = REL_BASE,
    )
}

fn header_rels_xml() -> String {
    format!(
        concat!(
            r#"{decl}<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
            r#"<Relationship Id="rId1" Type="{base}/image" Target="media/logo.png"/>"#,
            r#"</Relationships>"#,
        ),
        decl = XML_DECL,
        base = REL_BASE,
    )
}

fn numbering_xml() -> String {
    format!(
        concat!(
            r#"{decl}<w:numbering xmlns:w="{ns}">"#,
            r#"<w:abstractNum w:abstractNumId="0"><w:multiLevelType w:val="hybridMultilevel"/>"#,
            r#"<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="bullet"/><w:lvlText w:val="•"/>"#,
            r#"<w:lvlJc w:val="left"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:lvl>"#,
            r#"</w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#,
        ),
        decl = XML_DECL,
        ns = NS_W,
    )
}

fn write_part(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    data: &[u8],
) -> Result<(), RenderError> {
    zip.start_file(name, zip_entry_options())?;
    zip.write_all(data)?;
    Ok(())
}
