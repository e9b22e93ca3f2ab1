use crate::error::ConnectorError;
use finstat::{parse_response, sign_request, Record, RequestType};
use reqwest::StatusCode;
use tracing::{debug, info};

pub const FINSTAT_URL: &str = "https://finstat.sk/api";

/// Client for the Finstat company-data API
pub struct FinstatClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    private_key: String,
    request_type: RequestType,
}

impl FinstatClient {
    pub fn new(
        api_key: impl Into<String>,
        private_key: impl Into<String>,
        request_type: RequestType,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: FINSTAT_URL.to_string(),
            api_key: api_key.into(),
            private_key: private_key.into(),
            request_type,
        }
    }

    /// Point the client at another API root (e.g. a mock server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.request_type.as_str()
        )
    }

    /// Look up one ICO.
    ///
    /// Returns `Ok(None)` when the API answers with anything but 200, which is how
    /// unknown or invalid ICOs are reported. Transport errors and unparseable
    /// responses are returned as errors.
    pub async fn get_ico_data(&self, ico: &str) -> Result<Option<Record>, ConnectorError> {
        info!("Getting Finstat data for ico : {}", ico);
        let hash = sign_request(&self.api_key, &self.private_key, ico);

        let response = self
            .http
            .get(self.endpoint())
            .query(&[("ico", ico), ("apiKey", self.api_key.as_str()), ("Hash", hash.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            info!(
                "Error : ico {} is not a valid ico in the Finstat database (HTTP {})",
                ico, status
            );
            return Ok(None);
        }

        let body = response.text().await?;
        debug!("Received {} bytes for ico {}", body.len(), ico);

        let record = parse_response(&body, self.request_type)?;
        Ok(Some(record))
    }
}
