use std::fmt;
use std::str::FromStr;

/// One record as returned by the API: an ordered tree of string-keyed values.
///
/// Key order follows the order elements appeared in the XML response.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Finstat API endpoint to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    Detail,
    Extended,
    Ultimate,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Detail => "detail",
            RequestType::Extended => "extended",
            RequestType::Ultimate => "ultimate",
        }
    }

    /// Name of the top-level element wrapping a successful response
    /// (e.g. `DetailResult` for `detail`)
    pub fn result_element(&self) -> &'static str {
        match self {
            RequestType::Detail => "DetailResult",
            RequestType::Extended => "ExtendedResult",
            RequestType::Ultimate => "UltimateResult",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestType {
    type Err = FinstatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "detail" => Ok(RequestType::Detail),
            "extended" => Ok(RequestType::Extended),
            "ultimate" => Ok(RequestType::Ultimate),
            other => Err(FinstatError::InvalidRequestType(other.to_string())),
        }
    }
}

/// How successful records are shaped into output rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Fixed column preset per request type, failures written to a separate table
    #[default]
    Fixed,
    /// Nested fields flattened into columns discovered at runtime
    Flattened,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Fixed => "fixed",
            OutputMode::Flattened => "flattened",
        }
    }
}

impl FromStr for OutputMode {
    type Err = FinstatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed" => Ok(OutputMode::Fixed),
            "flattened" => Ok(OutputMode::Flattened),
            other => Err(FinstatError::InvalidOutputMode(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FinstatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("XML parse error: {0}")]
    Xml(String),
    #[error("Column '{0}' not found in input table")]
    MissingColumn(String),
    #[error("Unexpected response root: expected <{expected}>, found <{found}>")]
    UnexpectedRoot { expected: String, found: String },
    #[error("Invalid request type '{0}', expected one of: detail, extended, ultimate")]
    InvalidRequestType(String),
    #[error("Invalid output mode '{0}', expected one of: fixed, flattened")]
    InvalidOutputMode(String),
    #[error("No valid ICOs were found, nothing to write")]
    EmptyResult,
}

impl FinstatError {
    /// Errors caused by configuration or input data rather than by a bug or an outage
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            FinstatError::MissingColumn(_)
                | FinstatError::InvalidRequestType(_)
                | FinstatError::InvalidOutputMode(_)
                | FinstatError::EmptyResult
        )
    }
}

impl From<quick_xml::Error> for FinstatError {
    fn from(err: quick_xml::Error) -> Self {
        FinstatError::Xml(err.to_string())
    }
}
