use crate::error::ConnectorError;
use finstat::{OutputMode, RequestType};
use serde::{Deserialize, Serialize};

/// `config.json` as provided by the job harness
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobConfig {
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// User parameters, as entered; validated into [`Settings`]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Parameters {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default, rename = "#private_key", alias = "private_key")]
    pub private_key: Option<String>,
    #[serde(default)]
    pub request_type: Option<String>,
    #[serde(default)]
    pub ico_field: Option<String>,
    #[serde(default)]
    pub output_mode: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub input: InputMapping,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputMapping {
    #[serde(default)]
    pub tables: Vec<InputTable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputTable {
    pub destination: String,
}

/// Validated run settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub private_key: String,
    pub request_type: RequestType,
    pub ico_field: String,
    pub output_mode: OutputMode,
}

fn required(value: &Option<String>, key: &str, missing: &mut Vec<String>) -> String {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => {
            missing.push(key.to_string());
            String::new()
        }
    }
}

impl Parameters {
    pub fn validate(&self) -> Result<Settings, ConnectorError> {
        let mut missing = Vec::new();
        let api_key = required(&self.api_key, "api_key", &mut missing);
        let private_key = required(&self.private_key, "#private_key", &mut missing);
        let request_type = required(&self.request_type, "request_type", &mut missing);
        let ico_field = required(&self.ico_field, "ico_field", &mut missing);

        if !missing.is_empty() {
            return Err(ConnectorError::MissingParameters(missing));
        }

        let output_mode = match self.output_mode.as_deref() {
            Some(mode) if !mode.trim().is_empty() => mode.trim().parse::<OutputMode>()?,
            _ => OutputMode::default(),
        };

        Ok(Settings {
            api_key,
            private_key,
            request_type: request_type.parse::<RequestType>()?,
            ico_field,
            output_mode,
        })
    }
}

/// Metadata written next to every output table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableManifest {
    pub columns: Vec<String>,
    pub primary_key: Vec<String>,
    pub incremental: bool,
}
