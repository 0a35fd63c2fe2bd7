use reqwest::blocking::{Client, RequestBuilder};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use sheetsync_core::model::{
    AppendValuesResponse, BatchUpdateSpreadsheetRequest, BatchUpdateSpreadsheetResponse,
    BatchUpdateValuesRequest, BatchUpdateValuesResponse, SheetInfo, SheetProperties,
    SpreadsheetMetadata, SpreadsheetProperties, ValueInputOption, ValueRange,
};
use sheetsync_core::SheetValuesService;

use crate::config::Config;
use crate::error::ClientError;

/// Sheets v4 REST client.
///
/// Calls block the current thread; do not use it from inside an async
/// runtime.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: Client,
    base: Url,
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl SheetsClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let base = Url::parse(&config.api_base)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", config.api_base, e)))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(config.api_base.clone()));
        }

        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base,
            access_token: config.access_token.clone(),
        })
    }

    /// Build `<base>/<segments...>`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            let body = serde_json::from_str::<ErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or(text);
            tracing::debug!(status = status.as_u16(), %body, "request rejected");
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json()?)
    }

    /// Create a spreadsheet with the given tab titles
    pub fn create_spreadsheet(
        &self,
        title: &str,
        sheet_titles: &[&str],
    ) -> Result<SpreadsheetMetadata, ClientError> {
        let body = SpreadsheetMetadata {
            spreadsheet_id: None,
            properties: Some(SpreadsheetProperties {
                title: title.to_string(),
            }),
            sheets: sheet_titles
                .iter()
                .map(|t| SheetInfo {
                    properties: SheetProperties {
                        title: t.to_string(),
                        ..Default::default()
                    },
                })
                .collect(),
        };

        let url = self.endpoint(&["v4", "spreadsheets"])?;
        self.send(self.http.post(url).json(&body))
    }
}

impl SheetValuesService for SheetsClient {
    type Error = ClientError;

    fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<ValueRange, ClientError> {
        let url = self.endpoint(&["v4", "spreadsheets", spreadsheet_id, "values", range])?;
        tracing::debug!(%url, "get values");
        self.send(self.http.get(url))
    }

    fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        body: &ValueRange,
        input: ValueInputOption,
    ) -> Result<AppendValuesResponse, ClientError> {
        let target = format!("{range}:append");
        let url = self.endpoint(&["v4", "spreadsheets", spreadsheet_id, "values", &target])?;
        tracing::debug!(%url, rows = body.values.len(), "append values");
        self.send(
            self.http
                .post(url)
                .query(&[("valueInputOption", input.as_str())])
                .json(body),
        )
    }

    fn batch_update_values(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateValuesRequest,
    ) -> Result<BatchUpdateValuesResponse, ClientError> {
        let url = self.endpoint(&["v4", "spreadsheets", spreadsheet_id, "values:batchUpdate"])?;
        tracing::debug!(%url, ranges = body.data.len(), "batch update values");
        self.send(self.http.post(url).json(body))
    }

    fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<SpreadsheetMetadata, ClientError> {
        let url = self.endpoint(&["v4", "spreadsheets", spreadsheet_id])?;
        self.send(self.http.get(url))
    }

    fn batch_update_spreadsheet(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateSpreadsheetRequest,
    ) -> Result<BatchUpdateSpreadsheetResponse, ClientError> {
        let target = format!("{spreadsheet_id}:batchUpdate");
        let url = self.endpoint(&["v4", "spreadsheets", &target])?;
        self.send(self.http.post(url).json(body))
    }
}
