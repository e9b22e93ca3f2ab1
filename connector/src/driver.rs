use crate::client::{FinstatClient, FINSTAT_URL};
use crate::error::ConnectorError;
use crate::harness::{JobHarness, OutputTable};
use finstat::columns::ICO_COLUMN;
use finstat::{apply_api_limit, read_identifiers, run_timestamp, shaper_for, OutputMode, Record};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use tracing::{debug, info};

/// File name of the dynamic-schema output table
pub const FLATTENED_TABLE: &str = "finstat_output.csv";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub requested: usize,
    pub found: usize,
    pub failed: usize,
    /// ICOs over the API limit that were never requested
    pub dropped: usize,
}

/// ICO lookups of one run, split by outcome
#[derive(Debug, Default)]
pub struct Lookups {
    pub found: Vec<Record>,
    pub bad_icos: Vec<String>,
}

pub async fn run(harness: &JobHarness) -> Result<RunSummary, ConnectorError> {
    run_against(harness, FINSTAT_URL).await
}

pub async fn run_against(harness: &JobHarness, base_url: &str) -> Result<RunSummary, ConnectorError> {
    let settings = harness.settings()?;
    info!(
        "Starting Finstat '{}' extraction in '{}' mode",
        settings.request_type,
        settings.output_mode.as_str()
    );

    let timestamp = run_timestamp();
    debug!("Run timestamp: {}", timestamp);

    let input_path = harness.input_table_path()?;
    info!("Reading ICOs from {}", input_path.display());
    let reader = BufReader::new(File::open(&input_path)?);
    let all_icos = read_identifiers(reader, &settings.ico_field)?;
    let read_count = all_icos.len();
    let icos = apply_api_limit(all_icos);

    let client = FinstatClient::new(
        settings.api_key.as_str(),
        settings.private_key.as_str(),
        settings.request_type,
    )
    .with_base_url(base_url);
    let lookups = fetch_all(&client, &icos).await?;

    let shaper = shaper_for(settings.output_mode, settings.request_type);
    let rows: Vec<Record> = lookups
        .found
        .iter()
        .map(|raw| shaper.shape(raw, &timestamp))
        .collect();
    shaper.check_rows(&rows)?;
    let columns = shaper.columns(&rows);

    match settings.output_mode {
        OutputMode::Fixed => {
            let base_name = format!("finstat_{}", settings.request_type);
            harness.write_output(
                &OutputTable {
                    name: format!("{}.csv", base_name),
                    columns: &columns,
                    primary_key: &[ICO_COLUMN],
                    incremental: true,
                },
                &rows,
            )?;

            let bad_columns = vec![ICO_COLUMN.to_string()];
            let bad_rows: Vec<Record> = lookups.bad_icos.iter().map(|ico| bad_ico_row(ico)).collect();
            harness.write_output(
                &OutputTable {
                    name: format!("{}_bad_icos.csv", base_name),
                    columns: &bad_columns,
                    primary_key: &[ICO_COLUMN],
                    incremental: false,
                },
                &bad_rows,
            )?;
        }
        OutputMode::Flattened => {
            harness.write_output(
                &OutputTable {
                    name: FLATTENED_TABLE.to_string(),
                    columns: &columns,
                    primary_key: &[ICO_COLUMN],
                    incremental: true,
                },
                &rows,
            )?;
        }
    }

    Ok(RunSummary {
        requested: icos.len(),
        found: lookups.found.len(),
        failed: lookups.bad_icos.len(),
        dropped: read_count - icos.len(),
    })
}

/// Look up every ICO in order, one request at a time
pub async fn fetch_all(client: &FinstatClient, icos: &[String]) -> Result<Lookups, ConnectorError> {
    let mut lookups = Lookups::default();

    for ico in icos {
        match client.get_ico_data(ico).await? {
            Some(record) => lookups.found.push(record),
            None => lookups.bad_icos.push(ico.clone()),
        }
    }

    info!(
        "Finished lookups: {} found, {} not found",
        lookups.found.len(),
        lookups.bad_icos.len()
    );
    Ok(lookups)
}

fn bad_ico_row(ico: &str) -> Record {
    let mut row = Record::new();
    row.insert(ICO_COLUMN.to_string(), Value::String(ico.to_string()));
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TableManifest;
    use finstat::columns::DETAIL_COLUMNS;
    use finstat::{sign_request, FinstatError};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn detail_body(ico: &str, name: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<DetailResult xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns="http://www.finstat.sk/">
  <Ico>{ico}</Ico>
  <Name>{name}</Name>
  <City>Bratislava</City>
  <Cancelled />
  <JudgementIndicators>
    <JudgementIndicator><Name>Spory</Name><Value>false</Value></JudgementIndicator>
  </JudgementIndicators>
</DetailResult>"#
        )
    }

    fn setup(output_mode: &str, icos: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        let config = format!(
            r##"{{
                "parameters": {{
                    "api_key": "api-key",
                    "#private_key": "private-key",
                    "request_type": "detail",
                    "ico_field": "ico",
                    "output_mode": "{output_mode}"
                }},
                "storage": {{"input": {{"tables": [{{"destination": "icos.csv"}}]}}}}
            }}"##
        );
        fs::write(dir.path().join("config.json"), config).unwrap();

        let tables = dir.path().join("in").join("tables");
        fs::create_dir_all(&tables).unwrap();
        let mut csv = String::from("name,ico\n");
        for ico in icos {
            csv.push_str(&format!("company {ico},{ico}\n"));
        }
        fs::write(tables.join("icos.csv"), csv).unwrap();
        dir
    }

    async fn mock_found(server: &MockServer, ico: &str, name: &str) {
        Mock::given(method("GET"))
            .and(path("/detail"))
            .and(query_param("ico", ico))
            .and(query_param("Hash", sign_request("api-key", "private-key", ico)))
            .respond_with(ResponseTemplate::new(200).set_body_string(detail_body(ico, name)))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mock_not_found(server: &MockServer, ico: &str) {
        Mock::given(method("GET"))
            .and(path("/detail"))
            .and(query_param("ico", ico))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(server)
            .await;
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    fn read_manifest(path: &Path) -> TableManifest {
        let mut manifest_path = path.as_os_str().to_owned();
        manifest_path.push(".manifest");
        serde_json::from_str(&fs::read_to_string(manifest_path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_fixed_mode_partitions_found_and_bad_icos() {
        let server = MockServer::start().await;
        mock_found(&server, "12345678", "Alpha, s.r.o.").await;
        mock_not_found(&server, "00000000").await;

        let dir = setup("fixed", &["12345678", "00000000"]);
        let harness = JobHarness::new(dir.path()).unwrap();
        let summary = run_against(&harness, &server.uri()).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                requested: 2,
                found: 1,
                failed: 1,
                dropped: 0
            }
        );

        let out = dir.path().join("out").join("tables");
        let results = read_rows(&out.join("finstat_detail.csv"));
        assert_eq!(results.len(), 1);

        let row = &results[0];
        assert_eq!(row.len(), DETAIL_COLUMNS.len() + 1);
        assert_eq!(row[0], "12345678");
        assert_eq!(row[DETAIL_COLUMNS.iter().position(|c| *c == "Name").unwrap()], "Alpha, s.r.o.");
        assert_eq!(row[DETAIL_COLUMNS.iter().position(|c| *c == "City").unwrap()], "Bratislava");
        assert_eq!(row[DETAIL_COLUMNS.iter().position(|c| *c == "Dic").unwrap()], "");
        assert_eq!(row[DETAIL_COLUMNS.iter().position(|c| *c == "Cancelled").unwrap()], "");
        assert_eq!(
            row[DETAIL_COLUMNS.iter().position(|c| *c == "JudgementIndicators").unwrap()],
            r#"{"JudgementIndicator":{"Name":"Spory","Value":"false"}}"#
        );
        assert!(!row.last().unwrap().is_empty());

        let manifest = read_manifest(&out.join("finstat_detail.csv"));
        assert_eq!(manifest.columns.len(), DETAIL_COLUMNS.len() + 1);
        assert_eq!(manifest.columns.last().unwrap(), "timestamp");
        assert_eq!(manifest.primary_key, vec!["Ico"]);
        assert!(manifest.incremental);

        let bad = read_rows(&out.join("finstat_detail_bad_icos.csv"));
        assert_eq!(bad, vec![vec!["00000000".to_string()]]);

        let bad_manifest = read_manifest(&out.join("finstat_detail_bad_icos.csv"));
        assert_eq!(bad_manifest.columns, vec!["Ico"]);
        assert!(!bad_manifest.incremental);
    }

    #[tokio::test]
    async fn test_fixed_mode_all_failures_still_writes_tables() {
        let server = MockServer::start().await;
        mock_not_found(&server, "1").await;
        mock_not_found(&server, "2").await;

        let dir = setup("fixed", &["1", "2"]);
        let harness = JobHarness::new(dir.path()).unwrap();
        let summary = run_against(&harness, &server.uri()).await.unwrap();
        assert_eq!(summary.failed, 2);

        let out = dir.path().join("out").join("tables");
        assert!(read_rows(&out.join("finstat_detail.csv")).is_empty());
        assert_eq!(read_rows(&out.join("finstat_detail_bad_icos.csv")).len(), 2);
    }

    #[tokio::test]
    async fn test_flattened_mode_derives_columns() {
        let server = MockServer::start().await;
        mock_found(&server, "12345678", "Alpha").await;
        mock_not_found(&server, "00000000").await;
        mock_found(&server, "87654321", "Beta").await;

        let dir = setup("flattened", &["12345678", "00000000", "87654321"]);
        let harness = JobHarness::new(dir.path()).unwrap();
        let summary = run_against(&harness, &server.uri()).await.unwrap();
        assert_eq!(summary.found, 2);

        let out = dir.path().join("out").join("tables");
        assert!(!out.join("finstat_detail_bad_icos.csv").exists());

        let table = out.join(FLATTENED_TABLE);
        let manifest = read_manifest(&table);
        assert_eq!(
            manifest.columns,
            vec![
                "@xmlns:xsi",
                "@xmlns",
                "Ico",
                "Name",
                "City",
                "Cancelled",
                "JudgementIndicators__JudgementIndicator__Name",
                "JudgementIndicators__JudgementIndicator__Value",
                "update_date",
            ]
        );
        assert!(manifest.incremental);

        let rows = read_rows(&table);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][2], "12345678");
        assert_eq!(rows[1][2], "87654321");
        assert_eq!(rows[1][3], "Beta");
        assert_eq!(rows[0][6], "Spory");
        assert_eq!(rows[0][8], rows[1][8]);
    }

    #[tokio::test]
    async fn test_icos_over_the_api_limit_are_never_requested() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/detail"))
            .and(query_param("ico", "00005000"))
            .respond_with(ResponseTemplate::new(404))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/detail"))
            .respond_with(ResponseTemplate::new(404))
            .expect(5000)
            .mount(&server)
            .await;

        let icos: Vec<String> = (0..=5000).map(|i| format!("{:08}", i)).collect();
        let ico_refs: Vec<&str> = icos.iter().map(String::as_str).collect();
        let dir = setup("fixed", &ico_refs);
        let harness = JobHarness::new(dir.path()).unwrap();
        let summary = run_against(&harness, &server.uri()).await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                requested: 5000,
                found: 0,
                failed: 5000,
                dropped: 1
            }
        );

        let out = dir.path().join("out").join("tables");
        let bad = read_rows(&out.join("finstat_detail_bad_icos.csv"));
        assert_eq!(bad.len(), 5000);
        assert_eq!(bad[4999], vec!["00004999".to_string()]);
        assert!(!bad.iter().any(|row| row[0] == "00005000"));
        assert!(read_rows(&out.join("finstat_detail.csv")).is_empty());
    }

    #[tokio::test]
    async fn test_flattened_mode_without_results_fails() {
        let server = MockServer::start().await;
        mock_not_found(&server, "1").await;

        let dir = setup("flattened", &["1"]);
        let harness = JobHarness::new(dir.path()).unwrap();
        let err = run_against(&harness, &server.uri()).await.unwrap_err();

        assert!(matches!(err, ConnectorError::Finstat(FinstatError::EmptyResult)));
        assert_eq!(err.exit_code(), 1);
        assert!(!dir.path().join("out").join("tables").join(FLATTENED_TABLE).exists());
    }

    #[tokio::test]
    async fn test_missing_ico_column_is_a_user_error() {
        let server = MockServer::start().await;
        let dir = setup("fixed", &["1"]);
        fs::write(dir.path().join("in/tables/icos.csv"), "name,id\nAlpha,1\n").unwrap();

        let harness = JobHarness::new(dir.path()).unwrap();
        let err = run_against(&harness, &server.uri()).await.unwrap_err();

        assert!(matches!(err, ConnectorError::Finstat(FinstatError::MissingColumn(_))));
        assert_eq!(err.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_icos_are_requested_twice() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/detail"))
            .and(query_param("ico", "1"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;

        let client = FinstatClient::new("k", "p", finstat::RequestType::Detail).with_base_url(server.uri());
        let lookups = fetch_all(&client, &["1".to_string(), "1".to_string()]).await.unwrap();

        assert_eq!(lookups.bad_icos, vec!["1", "1"]);
        assert!(lookups.found.is_empty());
    }
}
