//! CSV → `Recipient` loader.
//!
//! The header must contain all six required columns (exact, case-sensitive names, any
//! order) or the whole upload is rejected with the list of missing names. Rows are
//! read permissively: short rows are padded with empty cells and empty required
//! fields are kept as empty strings.

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;
use tracing::debug;

use crate::recipients::models::{normalize_percentage, Recipient};

pub const COL_FULL_SALUTATION: &str = "full_salutation";
pub const COL_SALUTATION: &str = "salutation";
pub const COL_FIRST_NAME: &str = "First name";
pub const COL_LAST_NAME: &str = "Last name";
pub const COL_ELECTORATE: &str = "State/Electorate";
pub const COL_PERCENTAGE: &str = "percentage_electorate";

/// Required header columns, in the order they are reported when missing.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_FULL_SALUTATION,
    COL_SALUTATION,
    COL_FIRST_NAME,
    COL_LAST_NAME,
    COL_ELECTORATE,
    COL_PERCENTAGE,
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("No columns to parse from file")]
    Empty,

    #[error("Expected {expected} fields in line {line}, saw {found}")]
    RaggedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("{0}")]
    Csv(#[from] csv::Error),
}

/// Positions of the required columns in the header row.
struct ColumnIndex {
    full_salutation: usize,
    salutation: usize,
    first_name: usize,
    last_name: usize,
    electorate: usize,
    percentage: usize,
}

impl ColumnIndex {
    /// Resolves every required column. Duplicate header names resolve to the first.
    fn resolve(headers: &StringRecord) -> Result<Self, LoadError> {
        let positions: Vec<Option<usize>> = REQUIRED_COLUMNS
            .iter()
            .map(|name| headers.iter().position(|h| h == *name))
            .collect();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(&positions)
            .filter(|(_, pos)| pos.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns(missing));
        }

        let found: Vec<usize> = positions.into_iter().flatten().collect();
        Ok(Self {
            full_salutation: found[0],
            salutation: found[1],
            first_name: found[2],
            last_name: found[3],
            electorate: found[4],
            percentage: found[5],
        })
    }

    fn read(&self, record: &StringRecord) -> Recipient {
        Recipient {
            full_salutation: cell(record, self.full_salutation),
            salutation: cell(record, self.salutation),
            first_name: cell(record, self.first_name),
            last_name: cell(record, self.last_name),
            electorate: cell(record, self.electorate),
            percentage_electorate: normalize_percentage(record.get(self.percentage).unwrap_or("")),
        }
    }
}

/// Trimmed cell text with CRLF line endings folded to `\n`. Missing cells are empty.
fn cell(record: &StringRecord, index: usize) -> String {
    record
        .get(index)
        .unwrap_or("")
        .trim()
        .replace("\r\n", "\n")
}

/// Parses an uploaded CSV into recipients, in row order.
///
/// Fails only on unreadable input or a missing required column; no rendering is
/// attempted by callers until this succeeds.
pub fn load_recipients(data: &[u8]) -> Result<Vec<Recipient>, LoadError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(data);

    let headers = reader.headers()?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::Empty);
    }
    let columns = ColumnIndex::resolve(&headers)?;

    let mut recipients = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() > headers.len() {
            return Err(LoadError::RaggedRow {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                expected: headers.len(),
                found: record.len(),
            });
        }
        recipients.push(columns.read(&record));
    }

    debug!(
        "Loaded {} recipients from {} columns",
        recipients.len(),
        headers.len()
    );
    Ok(recipients)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "full_salutation,salutation,First name,Last name,State/Electorate,percentage_electorate";

    fn csv_with(rows: &[&str]) -> Vec<u8> {
        let mut out = String::from(HEADER);
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.into_bytes()
    }

    #[test]
    fn test_loads_multiline_quoted_salutation() {
        let data = csv_with(&[
            "\"Ms Jodie Belyea MP\nMember for Dunkley\",Dear Ms Belyea,Jodie,Belyea,Dunkley,26.18%",
        ]);
        let recipients = load_recipients(&data).unwrap();
        assert_eq!(recipients.len(), 1);
        let r = &recipients[0];
        assert_eq!(r.full_salutation, "Ms Jodie Belyea MP\nMember for Dunkley");
        assert_eq!(r.salutation, "Dear Ms Belyea");
        assert_eq!(r.first_name, "Jodie");
        assert_eq!(r.last_name, "Belyea");
        assert_eq!(r.electorate, "Dunkley");
        assert_eq!(r.percentage_electorate.as_deref(), Some("26.18%"));
    }

    #[test]
    fn test_empty_percentage_is_absent() {
        let data = csv_with(&["Senator Leah Blyth,Dear Senator Blyth,Leah,Blyth,SA,"]);
        let recipients = load_recipients(&data).unwrap();
        assert_eq!(recipients[0].percentage_electorate, None);
    }

    #[test]
    fn test_nan_percentage_is_absent() {
        let data = csv_with(&["Senator X,Dear Senator X,A,B,SA,nan"]);
        assert_eq!(load_recipients(&data).unwrap()[0].percentage_electorate, None);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let data = csv_with(&["  Mr A MP , Dear Mr A ,  Al , Able , Kooyong ,  12% "]);
        let r = &load_recipients(&data).unwrap()[0];
        assert_eq!(r.full_salutation, "Mr A MP");
        assert_eq!(r.salutation, "Dear Mr A");
        assert_eq!(r.first_name, "Al");
        assert_eq!(r.electorate, "Kooyong");
        assert_eq!(r.percentage_electorate.as_deref(), Some("12%"));
    }

    #[test]
    fn test_column_order_is_free() {
        let data = b"percentage_electorate,State/Electorate,Last name,First name,salutation,full_salutation,notes\n5%,Wills,Khan,Peter,Dear Mr Khan,Mr Peter Khan MP,ignored";
        let r = &load_recipients(data).unwrap()[0];
        assert_eq!(r.first_name, "Peter");
        assert_eq!(r.last_name, "Khan");
        assert_eq!(r.electorate, "Wills");
        assert_eq!(r.full_salutation, "Mr Peter Khan MP");
        assert_eq!(r.percentage_electorate.as_deref(), Some("5%"));
    }

    #[test]
    fn test_missing_salutation_column_reports_exactly_it() {
        let data = b"full_salutation,First name,Last name,State/Electorate,percentage_electorate\nX,A,B,C,";
        match load_recipients(data) {
            Err(LoadError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["salutation".to_string()]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_columns_are_listed_in_required_order() {
        let data = b"First name,salutation\nA,Dear A";
        match load_recipients(data) {
            Err(LoadError::MissingColumns(missing)) => assert_eq!(
                missing,
                vec![
                    "full_salutation",
                    "Last name",
                    "State/Electorate",
                    "percentage_electorate"
                ]
            ),
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn test_column_names_are_case_sensitive() {
        let data = b"full_salutation,Salutation,First name,Last name,State/Electorate,percentage_electorate\n";
        let err = load_recipients(data).unwrap_err();
        assert_eq!(
            err.to_string(),
            "CSV file is missing required columns: salutation"
        );
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(load_recipients(b""), Err(LoadError::Empty)));
    }

    #[test]
    fn test_header_only_yields_no_recipients() {
        let data = csv_with(&[]);
        assert!(load_recipients(&data).unwrap().is_empty());
    }

    #[test]
    fn test_bom_is_stripped_from_header() {
        let mut data = UTF8_BOM.to_vec();
        data.extend(csv_with(&["X,Dear X,A,B,C,1%"]));
        assert_eq!(load_recipients(&data).unwrap().len(), 1);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let data = csv_with(&["X,Dear X,A,B"]);
        let r = &load_recipients(&data).unwrap()[0];
        assert_eq!(r.electorate, "");
        assert_eq!(r.percentage_electorate, None);
    }

    #[test]
    fn test_empty_required_fields_are_tolerated() {
        let data = csv_with(&[",,,,,"]);
        let r = &load_recipients(&data).unwrap()[0];
        assert_eq!(r.salutation, "");
        assert_eq!(r.full_salutation, "");
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let data = csv_with(&["X,Dear X,A,B,C,1%,extra"]);
        match load_recipients(&data) {
            Err(LoadError::RaggedRow {
                line,
                expected,
                found,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(expected, 6);
                assert_eq!(found, 7);
            }
            other => panic!("expected RaggedRow, got {other:?}"),
        }
    }

    #[test]
    fn test_crlf_inside_quoted_cell_is_normalised() {
        let data = csv_with(&["\"Line one\r\nLine two\",Dear X,A,B,C,"]);
        let r = &load_recipients(&data).unwrap()[0];
        assert_eq!(r.full_salutation, "Line one\nLine two");
    }

    #[test]
    fn test_invalid_utf8_is_a_csv_error() {
        let mut data = csv_with(&[]);
        data.extend_from_slice(b"\n\xFF\xFE,Dear X,A,B,C,");
        assert!(matches!(load_recipients(&data), Err(LoadError::Csv(_))));
    }
}
