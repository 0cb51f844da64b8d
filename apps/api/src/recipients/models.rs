use serde::{Deserialize, Serialize};

/// Number of rows shown when previewing an upload.
pub const PREVIEW_ROWS: usize = 5;

/// Cell values treated as "no value" for the optional percentage column.
/// These are the spreadsheet/export spellings of a missing cell.
pub const MISSING_VALUE_MARKERS: &[&str] = &[
    "nan", "NaN", "NA", "N/A", "n/a", "null", "NULL", "None", "#N/A", "<NA>",
];

/// One letter addressee, read from a single CSV row.
///
/// Every string field is trimmed. `percentage_electorate` is `None` when the cell is
/// empty or holds a missing-value marker (e.g. a senator with no single electorate).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Title, role and committee memberships. Rendered verbatim, may span lines.
    pub full_salutation: String,
    /// Greeting line, e.g. "Dear Ms Belyea".
    pub salutation: String,
    pub first_name: String,
    pub last_name: String,
    pub electorate: String,
    pub percentage_electorate: Option<String>,
}

impl Recipient {
    /// Batch key: `<electorate>_<first>_<last>`, built from the unsanitised fields.
    pub fn key(&self) -> String {
        format!("{}_{}_{}", self.electorate, self.first_name, self.last_name)
    }

    /// `"<first> <last>"`, used for labels and the HTML page title.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Normalises a raw percentage cell. Returns `None` for blank or missing-value cells.
pub fn normalize_percentage(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || MISSING_VALUE_MARKERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The four display columns shown before generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipientPreview {
    pub first_name: String,
    pub last_name: String,
    pub electorate: String,
    pub percentage_electorate: Option<String>,
}

impl From<&Recipient> for RecipientPreview {
    fn from(r: &Recipient) -> Self {
        Self {
            first_name: r.first_name.clone(),
            last_name: r.last_name.clone(),
            electorate: r.electorate.clone(),
            percentage_electorate: r.percentage_electorate.clone(),
        }
    }
}

/// First `PREVIEW_ROWS` recipients in upload order.
pub fn preview_rows(recipients: &[Recipient]) -> Vec<RecipientPreview> {
    recipients
        .iter()
        .take(PREVIEW_ROWS)
        .map(RecipientPreview::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipient(first: &str, percentage: Option<&str>) -> Recipient {
        Recipient {
            full_salutation: format!("Ms {first} MP"),
            salutation: format!("Dear Ms {first}"),
            first_name: first.to_string(),
            last_name: "Smith".to_string(),
            electorate: "Dunkley".to_string(),
            percentage_electorate: percentage.map(str::to_string),
        }
    }

    #[test]
    fn test_key_joins_electorate_and_names() {
        assert_eq!(recipient("Jodie", None).key(), "Dunkley_Jodie_Smith");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(recipient("Jodie", None).display_name(), "Jodie Smith");
    }

    #[test]
    fn test_normalize_percentage_keeps_value() {
        assert_eq!(normalize_percentage(" 26.18% "), Some("26.18%".to_string()));
    }

    #[test]
    fn test_normalize_percentage_blank_is_absent() {
        assert_eq!(normalize_percentage(""), None);
        assert_eq!(normalize_percentage("   \t"), None);
    }

    #[test]
    fn test_normalize_percentage_markers_are_absent() {
        for marker in MISSING_VALUE_MARKERS {
            assert_eq!(normalize_percentage(marker), None, "marker {marker}");
        }
        assert_eq!(normalize_percentage(" nan "), None);
    }

    #[test]
    fn test_preview_caps_at_five_rows() {
        let recipients: Vec<_> = (0..8)
            .map(|i| recipient(&format!("R{i}"), Some("10%")))
            .collect();
        let preview = preview_rows(&recipients);
        assert_eq!(preview.len(), PREVIEW_ROWS);
        assert_eq!(preview[0].first_name, "R0");
        assert_eq!(preview[4].first_name, "R4");
    }

    #[test]
    fn test_preview_short_table() {
        let recipients = vec![recipient("Leah", None)];
        let preview = preview_rows(&recipients);
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0].percentage_electorate, None);
    }
}
