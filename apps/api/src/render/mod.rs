// Letter Renderer
// Implements: shared letter narrative, DOCX writer, HTML writer, best-effort enhancements.
// Both writers consume the same `narrative::Letter`; neither holds letter text of its own.

use std::borrow::Cow;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime};

pub mod docx;
pub mod enhance;
pub mod html;
pub mod logo;
pub mod narrative;
pub mod renderer;

pub use renderer::{LetterRenderer, OutputKind, RenderError, RenderedLetter};

/// Escapes text for XML element content and HTML text or double-quoted attributes.
/// Characters XML 1.0 does not allow (C0 controls other than tab/LF/CR, U+FFFE/U+FFFF)
/// are dropped.
pub(crate) fn escape_markup(text: &str) -> Cow<'_, str> {
    if !text
        .chars()
        .any(|c| matches!(c, '&' | '<' | '>' | '"') || !is_xml_char(c))
    {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c if !is_xml_char(c) => {}
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// The XML 1.0 `Char` production.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Deflate with the fixed DOS epoch timestamp, so zipped output is reproducible.
pub(crate) fn zip_entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain_text_is_borrowed() {
        assert!(matches!(escape_markup("Dear Ms Belyea"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(
            escape_markup(r#"Tom & "Jerry" <MP> it's"#),
            "Tom &amp; &quot;Jerry&quot; &lt;MP&gt; it's"
        );
    }

    #[test]
    fn test_escape_drops_xml_illegal_characters() {
        assert_eq!(
            escape_markup("Dear\u{1} Ms A\u{b}\u{0}\u{FFFF}"),
            "Dear Ms A"
        );
        assert_eq!(escape_markup("a\tb\nc"), "a\tb\nc");
    }
}
