use std::collections::HashMap;

use serde::Serialize;

/// Columns tried, in order, for each record field. First non-empty wins.
pub const ID_COLUMNS: &[&str] = &["id"];
pub const NAME_COLUMNS: &[&str] = &["name"];
pub const PARENT_COLUMNS: &[&str] = &["parent"];
pub const RESPONSIBLE_COLUMNS: &[&str] = &["responsable", "Responsable"];
pub const INITIALS_COLUMNS: &[&str] = &["iniciales", "nick", "Nick"];

/// Columns a CSV header must carry.
pub const REQUIRED_COLUMNS: &[&str] = &["id", "name", "parent"];

/// One row of the organization sheet, after normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawRecord {
    pub id: String,
    pub name: String,
    /// Empty means the record has no parent.
    pub parent: String,
    pub responsible: String,
    pub initials: String,
}

impl RawRecord {
    /// Build a record from a string-keyed row, applying the column fallbacks.
    pub fn from_row(row: &HashMap<String, String>) -> Self {
        RawRecord {
            id: lookup(row, ID_COLUMNS),
            name: lookup(row, NAME_COLUMNS),
            parent: lookup(row, PARENT_COLUMNS),
            responsible: lookup(row, RESPONSIBLE_COLUMNS),
            initials: lookup(row, INITIALS_COLUMNS),
        }
    }

    /// Same record with every field cleaned.
    pub fn normalized(&self) -> Self {
        RawRecord {
            id: clean(&self.id),
            name: clean(&self.name),
            parent: clean(&self.parent),
            responsible: clean(&self.responsible),
            initials: clean(&self.initials),
        }
    }

    pub fn has_parent(&self) -> bool {
        !self.parent.is_empty()
    }
}

/// Strip byte-order marks and surrounding whitespace.
pub fn clean(value: &str) -> String {
    value.replace('\u{FEFF}', "").trim().to_string()
}

fn lookup(row: &HashMap<String, String>, columns: &[&str]) -> String {
    columns
        .iter()
        .filter_map(|c| row.get(*c))
        .map(|v| clean(v))
        .find(|v| !v.is_empty())
        .unwrap_or_default()
}

/// Normalize all records and drop the ones without an id.
pub fn normalize_records(records: &[RawRecord]) -> Vec<RawRecord> {
    records
        .iter()
        .map(RawRecord::normalized)
        .filter(|r| !r.id.is_empty())
        .collect()
}
