use crate::columns::{preset_for, TIMESTAMP_COLUMN};
use crate::{Record, RecordShaper, RequestType};
use serde_json::Value;

/// Mode A: project each record onto the fixed column preset of its request type
pub struct FixedSchemaShaper {
    preset: &'static [&'static str],
}

impl FixedSchemaShaper {
    pub fn new(request_type: RequestType) -> Self {
        Self {
            preset: preset_for(request_type),
        }
    }
}

impl RecordShaper for FixedSchemaShaper {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn shape(&self, raw: &Record, timestamp: &str) -> Record {
        let mut row = Record::new();

        for &column in self.preset {
            let value = raw
                .get(column)
                .cloned()
                .unwrap_or_else(|| Value::String(String::new()));
            row.insert(column.to_string(), value);
        }

        row.insert(
            TIMESTAMP_COLUMN.to_string(),
            Value::String(timestamp.to_string()),
        );
        row
    }

    fn columns(&self, _rows: &[Record]) -> Vec<String> {
        self.preset
            .iter()
            .map(|c| c.to_string())
            .chain(std::iter::once(TIMESTAMP_COLUMN.to_string()))
            .collect()
    }
}
