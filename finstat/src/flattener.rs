use crate::columns::UPDATE_DATE_COLUMN;
use crate::table_writer::ColumnCollector;
use crate::{FinstatError, Record, RecordShaper};
use serde_json::Value;

/// Separator between parent and child keys in flattened column names
pub const KEY_DELIMITER: &str = "__";

/// Flatten nested mappings into a single level, joining key paths with `__`.
///
/// Arrays and scalars are leaves and are kept as they are. If two paths produce
/// the same key, the later value wins and the key keeps its first position.
pub fn flatten_record(record: &Record) -> Record {
    let mut flat = Record::new();
    flatten_into(None, record, &mut flat);
    flat
}

fn flatten_into(prefix: Option<&str>, record: &Record, out: &mut Record) {
    for (key, value) in record {
        let path = match prefix {
            Some(parent) => format!("{}{}{}", parent, KEY_DELIMITER, key),
            None => key.clone(),
        };

        match value {
            Value::Object(child) => flatten_into(Some(&path), child, out),
            leaf => {
                out.insert(path, leaf.clone());
            }
        }
    }
}

/// Mode B: flatten every record and derive the columns from what was observed
#[derive(Debug, Default)]
pub struct FlattenShaper;

impl FlattenShaper {
    pub fn new() -> Self {
        Self
    }
}

impl RecordShaper for FlattenShaper {
    fn name(&self) -> &'static str {
        "flattened"
    }

    fn shape(&self, raw: &Record, timestamp: &str) -> Record {
        let mut row = flatten_record(raw);
        row.insert(
            UPDATE_DATE_COLUMN.to_string(),
            Value::String(timestamp.to_string()),
        );
        row
    }

    fn columns(&self, rows: &[Record]) -> Vec<String> {
        let mut collector = ColumnCollector::new();
        for row in rows {
            collector.extend(row.keys());
        }
        collector.into_columns()
    }

    fn check_rows(&self, rows: &[Record]) -> Result<(), FinstatError> {
        if rows.is_empty() {
            return Err(FinstatError::EmptyResult);
        }
        Ok(())
    }
}
