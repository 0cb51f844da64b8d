use crate::recipients::Recipient;
use crate::render::OutputKind;

/// Characters stripped from each name component before composing a file name.
pub const FORBIDDEN_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

const LETTER_SUFFIX: &str = "MP Letter";

/// Removes `< > : " / \ | ? *`. No other normalisation (length, case, duplicates).
pub fn sanitize_component(component: &str) -> String {
    component
        .chars()
        .filter(|c| !FORBIDDEN_FILENAME_CHARS.contains(c))
        .collect()
}

/// `"<electorate>, <first> <last> - MP Letter"` with each component sanitised.
pub fn base_file_name(recipient: &Recipient) -> String {
    format!(
        "{}, {} {} - {LETTER_SUFFIX}",
        sanitize_component(&recipient.electorate),
        sanitize_component(&recipient.first_name),
        sanitize_component(&recipient.last_name),
    )
}

pub fn file_name(recipient: &Recipient, kind: OutputKind) -> String {
    format!("{}.{}", base_file_name(recipient), kind.extension())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient(electorate: &str, first: &str, last: &str) -> Recipient {
        Recipient {
            full_salutation: String::new(),
            salutation: String::new(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            electorate: electorate.to_string(),
            percentage_electorate: None,
        }
    }

    #[test]
    fn test_file_name_format() {
        let r = recipient("SA", "Leah", "Blyth");
        assert_eq!(base_file_name(&r), "SA, Leah Blyth - MP Letter");
        assert_eq!(file_name(&r, OutputKind::Docx), "SA, Leah Blyth - MP Letter.docx");
        assert_eq!(file_name(&r, OutputKind::Html), "SA, Leah Blyth - MP Letter.html");
    }

    #[test]
    fn test_sanitize_strips_every_forbidden_char() {
        assert_eq!(sanitize_component(r#"a<b>c:d"e/f\g|h?i*j"#), "abcdefghij");
    }

    #[test]
    fn test_sanitize_keeps_other_characters() {
        assert_eq!(sanitize_component("O'Brien-Smith (Jr.)"), "O'Brien-Smith (Jr.)");
        assert_eq!(sanitize_component("Zoë"), "Zoë");
    }

    #[test]
    fn test_file_name_contains_no_forbidden_chars() {
        let r = recipient("North/South: Qld", "A*n\"n", "<Lee>|?\\");
        let name = file_name(&r, OutputKind::Docx);
        for c in FORBIDDEN_FILENAME_CHARS {
            assert!(!name.contains(c), "{c} survived in {name}");
        }
        assert_eq!(name, "NorthSouth Qld, Ann Lee - MP Letter.docx");
    }
}
