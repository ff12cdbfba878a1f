mod load;
mod record;

pub use load::{records_from_csv, records_from_json};
pub use record::{clean, normalize_records, RawRecord};
