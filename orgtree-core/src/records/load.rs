// Tabular input -> RawRecord
//
// Two shapes are accepted:
// - CSV text with a header row (the published sheet as fetched)
// - a JSON array of string-keyed row objects (rows already parsed on the JS side)
//
// Header names are cleaned the same way values are, so a BOM in front of the
// first column does not hide the `id` column.

use std::collections::HashMap;

use csv::{ReaderBuilder, Trim};
use serde_json::Value;

use crate::error::{Error, Result};
use super::record::{clean, RawRecord, REQUIRED_COLUMNS};

/// Parse CSV text into records. Rows are returned in file order, unfiltered.
pub fn records_from_csv(input: &str) -> Result<Vec<RawRecord>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(clean).collect();
    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(Error::load(format!("missing required column '{}'", required)));
        }
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let map: HashMap<String, String> = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        records.push(RawRecord::from_row(&map));
    }
    log::debug!("parsed {} csv rows", records.len());
    Ok(records)
}

/// Parse a JSON array of row objects into records.
///
/// Non-string scalars are stringified; `null` and nested values count as empty.
pub fn records_from_json(input: &str) -> Result<Vec<RawRecord>> {
    let rows: Vec<HashMap<String, Value>> = serde_json::from_str(input)?;
    let records: Vec<RawRecord> = rows
        .iter()
        .map(|row| {
            let map: HashMap<String, String> = row
                .iter()
                .map(|(k, v)| (clean(k), scalar_to_string(v)))
                .collect();
            RawRecord::from_row(&map)
        })
        .collect();
    log::debug!("parsed {} json rows", records.len());
    Ok(records)
}

fn scalar_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_basic() {
        let input = "id,name,parent,responsable,iniciales\n1,Rectorate,,Ana,AR\n2,Finance,1,,\n";
        let records = records_from_csv(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Rectorate");
        assert_eq!(records[0].responsible, "Ana");
        assert_eq!(records[1].parent, "1");
        assert_eq!(records[1].initials, "");
    }

    #[test]
    fn test_csv_bom_header_and_alternate_columns() {
        let input = "\u{FEFF}id,name,parent,Responsable,Nick\n1,Root,,Luis,LG\n";
        let records = records_from_csv(input).unwrap();
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].responsible, "Luis");
        assert_eq!(records[0].initials, "LG");
    }

    #[test]
    fn test_csv_quoted_names_keep_commas() {
        let input = "id,name,parent\n1,\"Research, Development\",\n";
        let records = records_from_csv(input).unwrap();
        assert_eq!(records[0].name, "Research, Development");
    }

    #[test]
    fn test_csv_missing_column_is_load_failure() {
        let err = records_from_csv("id,name\n1,Root\n").unwrap_err();
        assert!(matches!(err, Error::LoadFailure { .. }));
    }

    #[test]
    fn test_csv_short_rows_are_tolerated() {
        let input = "id,name,parent,responsable\n1,Root\n\n";
        let records = records_from_csv(input).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].parent, "");
    }

    #[test]
    fn test_json_rows() {
        let input = r#"[{"id": 1, "name": "Root", "parent": ""}, {"id": "2", "name": "Child", "parent": 1, "nick": "CH"}]"#;
        let records = records_from_json(input).unwrap();
        assert_eq!(records[0].id, "1");
        assert_eq!(records[1].parent, "1");
        assert_eq!(records[1].initials, "CH");
    }

    #[test]
    fn test_json_malformed_is_load_failure() {
        let err = records_from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::LoadFailure { .. }));
    }
}
