// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Google Sheets v4 destination over plain REST.
//!
//! Authentication is not handled here: the caller supplies an OAuth access
//! token with the spreadsheets scope.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::destination::{CellRange, CellRef, Destination, DestinationError};

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4";

/// Sheets API client bound to one spreadsheet.
pub struct SheetsDestination {
    http: reqwest::Client,
    base_url: String,
    spreadsheet_id: String,
    access_token: String,
}

impl SheetsDestination {
    pub fn new(
        base_url: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            spreadsheet_id: spreadsheet_id.into(),
            access_token: access_token.into(),
        }
    }

    fn spreadsheet_url(&self) -> String {
        format!(
            "{}/spreadsheets/{}",
            self.base_url,
            urlencoding::encode(&self.spreadsheet_id)
        )
    }

    async fn post(&self, url: &str, body: serde_json::Value) -> Result<(), DestinationError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DestinationError::Request(e.to_string()))?;

        check_response(response).await?;
        Ok(())
    }

    /// Look up the numeric grid id of a sheet by its title.
    ///
    /// An empty title means the first sheet, the same sheet an A1 range
    /// without a `Sheet!` prefix addresses.
    async fn sheet_id(&self, sheet: &str) -> Result<i64, DestinationError> {
        let response = self
            .http
            .get(self.spreadsheet_url())
            .bearer_auth(&self.access_token)
            .query(&[("fields", "sheets.properties")])
            .send()
            .await
            .map_err(|e| DestinationError::Request(e.to_string()))?;

        let spreadsheet: Spreadsheet = check_response(response)
            .await?
            .json()
            .await
            .map_err(|e| DestinationError::Request(format!("JSON parse error: {}", e)))?;

        for s in &spreadsheet.sheets {
            tracing::debug!(title = %s.properties.title, id = s.properties.sheet_id, "Found sheet");
        }

        find_sheet_id(spreadsheet, sheet)
    }
}

#[async_trait]
impl Destination for SheetsDestination {
    async fn write_range(
        &mut self,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> Result<(), DestinationError> {
        let url = format!("{}/values:batchUpdate", self.spreadsheet_url());
        let body = json!({
            "valueInputOption": "USER_ENTERED",
            "data": [{
                "range": range.to_string(),
                "values": rows,
            }],
        });
        self.post(&url, body).await
    }

    async fn clear_range(&mut self, range: &CellRange) -> Result<(), DestinationError> {
        let url = format!("{}/values:batchClear", self.spreadsheet_url());
        self.post(&url, json!({ "ranges": [range.to_string()] }))
            .await
    }

    async fn set_note(
        &mut self,
        sheet: &str,
        cell: CellRef,
        note: &str,
    ) -> Result<(), DestinationError> {
        let sheet_id = self.sheet_id(sheet).await?;
        let row = cell.row.saturating_sub(1);
        let column = cell.column_index();

        // Field mask limited to the note so the header text survives.
        let body = json!({
            "requests": [{
                "updateCells": {
                    "range": {
                        "sheetId": sheet_id,
                        "startRowIndex": row,
                        "endRowIndex": row + 1,
                        "startColumnIndex": column,
                        "endColumnIndex": column + 1,
                    },
                    "fields": "note",
                    "rows": [{ "values": [{ "note": note }] }],
                }
            }]
        });

        let url = format!("{}:batchUpdate", self.spreadsheet_url());
        self.post(&url, body).await
    }
}

#[derive(Debug, Deserialize)]
struct Spreadsheet {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Debug, Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    #[serde(default)]
    sheet_id: i64,
    #[serde(default)]
    title: String,
}

fn find_sheet_id(spreadsheet: Spreadsheet, sheet: &str) -> Result<i64, DestinationError> {
    let mut sheets = spreadsheet.sheets.into_iter();
    let found = if sheet.is_empty() {
        sheets.next()
    } else {
        sheets.find(|s| s.properties.title == sheet)
    };
    found
        .map(|s| s.properties.sheet_id)
        .ok_or_else(|| DestinationError::SheetNotFound(sheet.to_string()))
}

/// Turn a non-2xx response into a [`DestinationError::Status`].
async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, DestinationError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    if status == 429 {
        tracing::warn!("Sheets API rate limit hit (429)");
    }
    Err(DestinationError::Status { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreadsheet_url_is_encoded() {
        let dest = SheetsDestination::new(DEFAULT_SHEETS_BASE_URL, "abc/def", "token");
        assert_eq!(
            dest.spreadsheet_url(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc%2Fdef"
        );
    }

    #[test]
    fn test_sheet_properties_parse() {
        let body = r#"{"sheets":[{"properties":{"sheetId":0,"title":"Sheet1"}},
            {"properties":{"sheetId":1234,"title":"Riders"}}]}"#;
        let spreadsheet: Spreadsheet = serde_json::from_str(body).unwrap();
        assert_eq!(spreadsheet.sheets[1].properties.sheet_id, 1234);
        assert_eq!(spreadsheet.sheets[1].properties.title, "Riders");
    }

    #[test]
    fn test_empty_sheet_name_is_first_sheet() {
        let body = r#"{"sheets":[{"properties":{"sheetId":77,"title":"Sheet1"}},
            {"properties":{"sheetId":1234,"title":"Riders"}}]}"#;
        let parse = || serde_json::from_str::<Spreadsheet>(body).unwrap();

        assert_eq!(find_sheet_id(parse(), "").unwrap(), 77);
        assert_eq!(find_sheet_id(parse(), "Riders").unwrap(), 1234);
        assert!(matches!(
            find_sheet_id(parse(), "Missing"),
            Err(DestinationError::SheetNotFound(name)) if name == "Missing"
        ));

        let empty = Spreadsheet { sheets: Vec::new() };
        assert!(find_sheet_id(empty, "").is_err());
    }
}
