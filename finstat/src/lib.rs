// Finstat connector core: request signing, response parsing and record shaping.
// HTTP and the job harness live in the connector binary.

pub mod types;
pub mod columns;
pub mod signer;
pub mod xml_parser;
pub mod identifiers;
pub mod timestamp;
pub mod table_writer;

// Record shapers
pub mod shaper;
pub mod normalizer;
pub mod flattener;

// Re-export main types
pub use types::*;
pub use shaper::{shaper_for, render_cell, RecordShaper};
pub use signer::sign_request;
pub use xml_parser::{parse_document, parse_response};
pub use identifiers::{apply_api_limit, read_identifiers, API_LIMIT};
pub use timestamp::run_timestamp;
pub use table_writer::{write_table, ColumnCollector};

// Re-export shapers
pub use normalizer::FixedSchemaShaper;
pub use flattener::{flatten_record, FlattenShaper};
