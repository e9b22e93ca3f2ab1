use crate::error::ConnectorError;
use crate::models::{JobConfig, Settings, TableManifest};
use finstat::{write_table, Record};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable pointing at the job data directory
pub const DATA_DIR_ENV: &str = "KBC_DATADIR";
const DEFAULT_DATA_DIR: &str = "/data/";

/// One output table: where it goes and how the platform should load it
pub struct OutputTable<'a> {
    pub name: String,
    pub columns: &'a [String],
    pub primary_key: &'a [&'a str],
    pub incremental: bool,
}

/// File-based job harness: `config.json`, `in/tables/` and `out/tables/`
/// under one data directory
pub struct JobHarness {
    data_dir: PathBuf,
    config: JobConfig,
}

impl JobHarness {
    pub fn from_env() -> Result<Self, ConnectorError> {
        let data_dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        Self::new(data_dir)
    }

    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, ConnectorError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        let config_path = data_dir.join("config.json");
        info!("Loading configuration from {}", config_path.display());

        let json = fs::read_to_string(&config_path).map_err(|e| {
            ConnectorError::Config(format!(
                "Unable to read {}: {}",
                config_path.display(),
                e
            ))
        })?;
        let config = serde_json::from_str(&json)?;

        Ok(Self { data_dir, config })
    }

    pub fn settings(&self) -> Result<Settings, ConnectorError> {
        self.config.parameters.validate()
    }

    pub fn input_tables_dir(&self) -> PathBuf {
        self.data_dir.join("in").join("tables")
    }

    pub fn output_tables_dir(&self) -> PathBuf {
        self.data_dir.join("out").join("tables")
    }

    /// Path of the first input table: the first mapped table, or the first
    /// CSV file in `in/tables/` when no mapping is configured
    pub fn input_table_path(&self) -> Result<PathBuf, ConnectorError> {
        let tables_dir = self.input_tables_dir();

        if let Some(table) = self.config.storage.input.tables.first() {
            return Ok(tables_dir.join(&table.destination));
        }

        let mut candidates = Vec::new();
        if tables_dir.exists() {
            for entry in fs::read_dir(&tables_dir)? {
                let path = entry?.path();
                if path.extension().and_then(|s| s.to_str()) == Some("csv") {
                    candidates.push(path);
                }
            }
        }
        candidates.sort();

        candidates.into_iter().next().ok_or_else(|| {
            ConnectorError::Config(format!(
                "No input table found in {}",
                tables_dir.display()
            ))
        })
    }

    /// Write the rows of one output table and its manifest
    pub fn write_output(&self, table: &OutputTable, rows: &[Record]) -> Result<PathBuf, ConnectorError> {
        let out_dir = self.output_tables_dir();
        fs::create_dir_all(&out_dir)?;

        let table_path = out_dir.join(&table.name);
        let file = fs::File::create(&table_path)?;
        write_table(BufWriter::new(file), table.columns, rows)?;

        let manifest = TableManifest {
            columns: table.columns.to_vec(),
            primary_key: table.primary_key.iter().map(|k| k.to_string()).collect(),
            incremental: table.incremental,
        };
        self.write_manifest(&table_path, &manifest)?;

        info!(
            "Wrote {} rows to {} (incremental: {})",
            rows.len(),
            table.name,
            table.incremental
        );
        Ok(table_path)
    }

    fn write_manifest(&self, table_path: &Path, manifest: &TableManifest) -> Result<(), ConnectorError> {
        let mut manifest_path = table_path.as_os_str().to_owned();
        manifest_path.push(".manifest");

        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(&manifest_path, json)?;
        debug!("Wrote manifest {:?}", manifest_path);
        Ok(())
    }
}
