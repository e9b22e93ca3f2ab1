use crate::{FinstatError, FixedSchemaShaper, FlattenShaper, OutputMode, Record, RequestType};
use serde_json::Value;
use tracing::info;

/// Base trait for turning raw API records into output rows
pub trait RecordShaper: Send + Sync {
    /// Returns the name of this shaper (e.g., "fixed", "flattened")
    fn name(&self) -> &'static str;

    /// Shape one successful record, stamping it with the run timestamp
    fn shape(&self, raw: &Record, timestamp: &str) -> Record;

    /// Output column order for the shaped rows of one run
    fn columns(&self, rows: &[Record]) -> Vec<String>;

    /// Validate the shaped rows before anything is written
    fn check_rows(&self, _rows: &[Record]) -> Result<(), FinstatError> {
        Ok(())
    }
}

/// Select the shaper for a run
pub fn shaper_for(mode: OutputMode, request_type: RequestType) -> Box<dyn RecordShaper> {
    let shaper: Box<dyn RecordShaper> = match mode {
        OutputMode::Fixed => Box::new(FixedSchemaShaper::new(request_type)),
        OutputMode::Flattened => Box::new(FlattenShaper::new()),
    };
    info!("Using '{}' shaper for '{}' requests", shaper.name(), request_type);
    shaper
}

/// Render one value as a CSV cell.
///
/// Null becomes an empty cell; nested objects and arrays are written as compact JSON.
pub fn render_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(_) | Value::Array(_) => value.to_string(),
    }
}
