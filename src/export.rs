//! CSV Export
//!
//! Renders records as a spreadsheet-friendly CSV document.

use crate::models::{Flag, Record};

/// MIME type of the downloaded file
pub const CSV_MIME: &str = "text/csv;charset=utf-8;";

/// UTF-8 byte-order mark; spreadsheet apps need it to pick the right encoding
pub const BOM: char = '\u{feff}';

/// Render `records` as CSV, or `None` when there is nothing to export.
///
/// Header is `code_header` followed by each flag key. The code column is
/// always quoted (inner quotes doubled); flags are `true`/`false`.
pub fn render_csv(records: &[Record], code_header: &str) -> Option<String> {
    if records.is_empty() {
        return None;
    }

    let header = std::iter::once(code_header)
        .chain(Flag::ALL.iter().map(|flag| flag.key()))
        .collect::<Vec<_>>()
        .join(",");

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(header);
    for record in records {
        let mut row = quote(&record.code);
        for (_, checked) in record.checklist.entries() {
            row.push(',');
            row.push_str(if checked { "true" } else { "false" });
        }
        lines.push(row);
    }

    let mut csv = String::new();
    csv.push(BOM);
    csv.push_str(&lines.join("\n"));
    Some(csv)
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Checklist;

    fn body(csv: &str) -> &str {
        csv.strip_prefix(BOM).expect("missing BOM")
    }

    #[test]
    fn test_empty_export_is_none() {
        assert_eq!(render_csv(&[], "Code"), None);
    }

    #[test]
    fn test_single_record_layout() {
        let checklist = Checklist::default()
            .with(Flag::Mass, true)
            .with(Flag::Confession, true);
        let csv = render_csv(&[Record::new("ABC123", checklist)], "Code").unwrap();

        let lines: Vec<&str> = body(&csv).lines().collect();
        assert_eq!(lines, vec![
            "Code,قداس,تناول,اعتراف,ادوات,صلاة",
            "\"ABC123\",true,false,true,false,false",
        ]);
    }

    #[test]
    fn test_one_row_per_record() {
        let records = vec![
            Record::new("a", Checklist::default()),
            Record::new("b", Checklist::default().with(Flag::Prayer, true)),
            Record::new("c", Checklist::default()),
        ];
        let csv = render_csv(&records, "Code").unwrap();
        assert_eq!(body(&csv).lines().count(), 4);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_codes_with_separators_parse_back() {
        let tricky = "a,b \"quoted\"\nnext";
        let records = vec![
            Record::new(tricky, Checklist::default().with(Flag::Communion, true)),
            Record::new("plain", Checklist::default()),
        ];
        let csv = render_csv(&records, "Code").unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(body(&csv).as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 6);
        assert_eq!(&headers[0], "Code");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], tricky);
        assert_eq!(&rows[0][2], "true");
        assert_eq!(&rows[1][0], "plain");
        assert!(rows[1].iter().skip(1).all(|v| v == "false"));
    }

    #[test]
    fn test_custom_code_header() {
        let csv = render_csv(&[Record::new("x", Checklist::default())], "QR Code").unwrap();
        assert!(body(&csv).starts_with("QR Code,"));
    }
}
