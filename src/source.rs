// src/source.rs

use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::ingest::{self, Row};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{error, info, warn};
use urlencoding::encode;

/// Anything that can hand back the sheet as rows of cells.
#[async_trait]
pub trait RowSource: Send + Sync {
    async fn fetch_rows(&self) -> Result<Vec<Row>, FetchError>;

    fn describe(&self) -> String;
}

/// Published CSV export reachable over a plain GET.
pub struct CsvExportSource {
    client: Client,
    url: String,
}

impl CsvExportSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl RowSource for CsvExportSource {
    async fn fetch_rows(&self) -> Result<Vec<Row>, FetchError> {
        let resp = self.client.get(&self.url).send().await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        let text = resp.text().await?;
        Ok(ingest::parse_csv(&text))
    }

    fn describe(&self) -> String {
        format!("csv export {}", self.url)
    }
}

/// Spreadsheet values API, authenticated with a bearer token.
pub struct SheetsApiSource {
    client: Client,
    api_base_url: String,
    sheet_id: String,
    range: String,
    access_token: Option<String>,
}

impl SheetsApiSource {
    pub fn new(
        client: Client,
        api_base_url: impl Into<String>,
        sheet_id: impl Into<String>,
        range: impl Into<String>,
        access_token: Option<String>,
    ) -> Self {
        Self {
            client,
            api_base_url: api_base_url.into(),
            sheet_id: sheet_id.into(),
            range: range.into(),
            access_token,
        }
    }

    fn values_url(&self) -> String {
        format!(
            "{}/{}/values/{}",
            self.api_base_url.trim_end_matches('/'),
            encode(&self.sheet_id),
            encode(&self.range)
        )
    }
}

#[async_trait]
impl RowSource for SheetsApiSource {
    async fn fetch_rows(&self) -> Result<Vec<Row>, FetchError> {
        let token = self.access_token.as_deref().ok_or(FetchError::MissingToken)?;

        let resp = self
            .client
            .get(self.values_url())
            .bearer_auth(token)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(FetchError::AuthExpired);
        }
        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status().as_u16()));
        }

        let body = resp.text().await?;
        ingest::parse_values_payload(&body)
    }

    fn describe(&self) -> String {
        format!("sheets api {} [{}]", self.sheet_id, self.range)
    }
}

/// Build the configured source. `access_token` is ignored by the CSV export.
pub fn from_config(
    client: Client,
    cfg: &SourceConfig,
    access_token: Option<String>,
) -> Box<dyn RowSource> {
    match cfg {
        SourceConfig::Csv { url } => Box::new(CsvExportSource::new(client, url.clone())),
        SourceConfig::SheetsApi {
            sheet_id,
            range,
            api_base_url,
        } => Box::new(SheetsApiSource::new(
            client,
            api_base_url.clone(),
            sheet_id.clone(),
            range.clone(),
            access_token,
        )),
    }
}

/// Rows from one fetch, plus the failure that emptied them, if any.
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub rows: Vec<Row>,
    pub error: Option<FetchError>,
}

impl FetchOutcome {
    pub fn auth_expired(&self) -> bool {
        self.error.as_ref().is_some_and(FetchError::is_auth_expired)
    }
}

/// Fetch rows without letting a failure escape: on error the rows are empty
/// and the error is handed back alongside them.
pub async fn load_rows(source: &dyn RowSource) -> FetchOutcome {
    info!(source = %source.describe(), "Fetching sheet rows");

    match source.fetch_rows().await {
        Ok(rows) => {
            if rows.is_empty() {
                warn!("Sheet returned no rows");
            }
            info!(rows = rows.len(), "Rows fetched");
            FetchOutcome { rows, error: None }
        }
        Err(e) => {
            error!(error = %e, "Could not load sheet data");
            FetchOutcome {
                rows: Vec::new(),
                error: Some(e),
            }
        }
    }
}
