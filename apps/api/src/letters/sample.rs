//! Downloadable example upload showing the expected columns.

pub const SAMPLE_CSV_NAME: &str = "mp_letters_template.csv";

/// Header plus two rows: an MP with a percentage and a senator without one.
pub const SAMPLE_CSV: &str = concat!(
    "full_salutation,salutation,First name,Last name,State/Electorate,percentage_electorate\n",
    "\"Ms Jodie Belyea MP\n",
    "Member for Dunkley\n",
    "Member of Standing Committee on Health, Aged Care and Disability\",Dear Ms Belyea,Jodie,Belyea,Dunkley,26.18%\n",
    "\"Senator Leah Blyth\n",
    "Senator for South Australia\",Dear Senator Blyth,Leah,Blyth,SA,\n",
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::file_name;
    use crate::config::Config;
    use crate::recipients::{load_recipients, REQUIRED_COLUMNS};
    use crate::render::{LetterRenderer, OutputKind};
    use std::io::{Cursor, Read};

    #[test]
    fn test_sample_loads_both_rows() {
        let recipients = load_recipients(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(recipients.len(), 2);
        assert_eq!(
            recipients[0].full_salutation,
            "Ms Jodie Belyea MP\nMember for Dunkley\nMember of Standing Committee on Health, Aged Care and Disability"
        );
        assert_eq!(recipients[0].percentage_electorate.as_deref(), Some("26.18%"));
        assert_eq!(recipients[1].percentage_electorate, None);
    }

    #[test]
    fn test_sample_header_matches_required_columns() {
        let header = SAMPLE_CSV.lines().next().unwrap();
        assert_eq!(header, REQUIRED_COLUMNS.join(","));
    }

    #[test]
    fn test_senator_row_end_to_end() {
        let recipients = load_recipients(SAMPLE_CSV.as_bytes()).unwrap();
        let blyth = &recipients[1];
        assert_eq!(
            blyth.full_salutation,
            "Senator Leah Blyth\nSenator for South Australia"
        );

        let renderer = LetterRenderer::from_config(&Config::default());
        let letter = renderer.render(blyth).unwrap();
        assert_eq!(
            file_name(&letter.recipient, OutputKind::Docx),
            "SA, Leah Blyth - MP Letter.docx"
        );

        let mut archive = zip::ZipArchive::new(Cursor::new(letter.docx.as_ref())).unwrap();
        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        let first_bullet = xml
            .split(r#"<w:pStyle w:val="ListBullet"/>"#)
            .nth(1)
            .unwrap();
        assert!(first_bullet.starts_with(
            r#"</w:pPr><w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Many of your constituents</w:t>"#
        ));
    }
}
