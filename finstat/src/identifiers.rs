use crate::FinstatError;
use csv::Reader;
use std::io::Read;
use tracing::{info, warn};

/// Maximum number of ICOs requested in one run
pub const API_LIMIT: usize = 5000;

/// Read the ICO column from a CSV input table, one value per row in row order.
///
/// The table must have a header row containing `column`.
pub fn read_identifiers<R: Read>(reader: R, column: &str) -> Result<Vec<String>, FinstatError> {
    let mut csv_reader = Reader::from_reader(reader);

    let index = csv_reader
        .headers()?
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| FinstatError::MissingColumn(column.to_string()))?;

    let mut icos = Vec::new();
    for record_result in csv_reader.records() {
        let record = record_result?;
        let ico = record
            .get(index)
            .ok_or_else(|| FinstatError::MissingColumn(column.to_string()))?;
        icos.push(ico.to_string());
    }

    info!("Read {} ICOs from column '{}'", icos.len(), column);
    Ok(icos)
}

/// Keep only the first `API_LIMIT` ICOs, the rest are dropped
pub fn apply_api_limit(mut icos: Vec<String>) -> Vec<String> {
    if icos.len() > API_LIMIT {
        warn!(
            "You are requesting more than {} ICOs to be extracted, only the first {} will be extracted",
            API_LIMIT, API_LIMIT
        );
        icos.truncate(API_LIMIT);
    }
    icos
}
