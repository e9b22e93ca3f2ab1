use crate::shaper::render_cell;
use crate::{FinstatError, Record};
use std::collections::HashSet;
use std::io::Write;
use tracing::debug;

/// Insertion-ordered set of column names
#[derive(Debug, Default)]
pub struct ColumnCollector {
    columns: Vec<String>,
    seen: HashSet<String>,
}

impl ColumnCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: &str) -> bool {
        if self.seen.contains(column) {
            return false;
        }
        self.seen.insert(column.to_string());
        self.columns.push(column.to_string());
        true
    }

    pub fn extend<'a>(&mut self, columns: impl IntoIterator<Item = &'a String>) {
        for column in columns {
            self.insert(column);
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn into_columns(self) -> Vec<String> {
        self.columns
    }
}

/// Write rows as CSV in the given column order.
///
/// No header line is written: column names travel in the table manifest.
/// Cells missing from a row are written empty, keys outside `columns` are ignored.
pub fn write_table<W: Write>(
    writer: W,
    columns: &[String],
    rows: &[Record],
) -> Result<(), FinstatError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for row in rows {
        let cells = columns
            .iter()
            .map(|column| row.get(column).map(render_cell).unwrap_or_default());
        csv_writer.write_record(cells)?;
    }

    csv_writer.flush()?;
    debug!("Wrote {} rows x {} columns", rows.len(), columns.len());
    Ok(())
}
