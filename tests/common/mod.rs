// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::Path,
    extract::Query,
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use zwiftpower_tracker::sink::{CellRange, CellRef, Destination, DestinationError};

/// One call made against a [`RecordingDestination`].
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Write { range: String, rows: Vec<Vec<String>> },
    Clear { range: String },
    Note { sheet: String, cell: String, note: String },
}

/// In-memory destination that records every call.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingDestination {
    pub calls: Vec<Call>,
    pub fail_writes: bool,
    pub fail_setup: bool,
}

#[allow(dead_code)]
impl RecordingDestination {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<(String, usize)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Write { range, rows } => Some((range.clone(), rows.len())),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Destination for RecordingDestination {
    async fn write_range(
        &mut self,
        range: &CellRange,
        rows: &[Vec<String>],
    ) -> Result<(), DestinationError> {
        self.calls.push(Call::Write {
            range: range.to_string(),
            rows: rows.to_vec(),
        });
        if self.fail_writes {
            return Err(DestinationError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }

    async fn clear_range(&mut self, range: &CellRange) -> Result<(), DestinationError> {
        self.calls.push(Call::Clear {
            range: range.to_string(),
        });
        if self.fail_setup {
            return Err(DestinationError::Request("connection refused".to_string()));
        }
        Ok(())
    }

    async fn set_note(
        &mut self,
        sheet: &str,
        cell: CellRef,
        note: &str,
    ) -> Result<(), DestinationError> {
        self.calls.push(Call::Note {
            sheet: sheet.to_string(),
            cell: cell.to_string(),
            note: note.to_string(),
        });
        Ok(())
    }
}

/// Build one upstream event record as ZwiftPower encodes it.
#[allow(dead_code)]
pub fn raw_event(kind: &str, title: &str, event_date: Value, avg_wkg: Value, wkg_ftp: Value) -> Value {
    json!({
        "f_t": kind,
        "event_title": title,
        "event_date": event_date,
        "avg_wkg": avg_wkg,
        "wkg_ftp": wkg_ftp,
        "distance": 20,
    })
}

/// Canned upstream data for the fake ZwiftPower server.
#[allow(dead_code)]
#[derive(Default, Clone)]
pub struct FakeZwiftPower {
    /// club id -> roster entries
    pub clubs: HashMap<u64, Vec<Value>>,
    /// zwid -> event records
    pub profiles: HashMap<u64, Vec<Value>>,
}

/// Serve a fake ZwiftPower on an ephemeral local port; returns its base URL.
#[allow(dead_code)]
pub async fn spawn_fake_zwiftpower(data: FakeZwiftPower) -> String {
    let data = Arc::new(data);
    let clubs = data.clone();
    let profiles = data.clone();

    let app = Router::new()
        .route(
            "/api3.php",
            get(move |Query(q): Query<HashMap<String, String>>| {
                let data = clubs.clone();
                async move {
                    let id: u64 = q.get("id").and_then(|v| v.parse().ok()).unwrap_or(0);
                    match data.clubs.get(&id) {
                        Some(riders) => Ok(Json(json!({ "data": riders }))),
                        None => Err(StatusCode::NOT_FOUND),
                    }
                }
            }),
        )
        .route("/profile.php", get(|| async { "ok" }))
        .route(
            "/cache3/profile/{file}",
            get(move |Path(file): Path<String>| {
                let data = profiles.clone();
                async move {
                    let events = file
                        .strip_suffix("_all.json")
                        .and_then(|v| v.parse::<u64>().ok())
                        .and_then(|zwid| data.profiles.get(&zwid));
                    match events {
                        Some(events) => Ok(Json(json!({ "data": events }))),
                        None => Err(StatusCode::NOT_FOUND),
                    }
                }
            }),
        );

    serve_locally(app).await
}

/// Which Sheets API call a request was.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetsOp {
    /// GET of the spreadsheet's sheet properties
    Lookup,
    /// `values:batchUpdate`
    Write,
    /// `values:batchClear`
    Clear,
    /// `:batchUpdate` carrying cell updates
    Update,
}

impl SheetsOp {
    fn classify(method: &Method, path: &str) -> Self {
        if method == Method::GET {
            SheetsOp::Lookup
        } else if path.ends_with("/values:batchUpdate") {
            SheetsOp::Write
        } else if path.ends_with("/values:batchClear") {
            SheetsOp::Clear
        } else {
            SheetsOp::Update
        }
    }
}

/// One request received by the fake Sheets server.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SheetsRequest {
    pub op: SheetsOp,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Value,
}

/// Canned spreadsheet layout and failures for the fake Sheets server.
#[allow(dead_code)]
#[derive(Default, Clone)]
pub struct FakeSheets {
    /// (sheetId, title) in tab order
    pub sheets: Vec<(i64, String)>,
    /// Status returned for an operation instead of 200
    pub failures: HashMap<SheetsOp, u16>,
}

/// Handle on a running fake Sheets server.
#[allow(dead_code)]
pub struct SheetsServer {
    pub base_url: String,
    log: Arc<Mutex<Vec<SheetsRequest>>>,
}

#[allow(dead_code)]
impl SheetsServer {
    pub fn requests(&self) -> Vec<SheetsRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_for(&self, op: SheetsOp) -> Vec<SheetsRequest> {
        self.requests().into_iter().filter(|r| r.op == op).collect()
    }
}

/// Serve a fake Sheets v4 API on an ephemeral local port.
///
/// Every request is recorded. Paths use `:` verbs, so one fallback handler
/// classifies them instead of routes.
#[allow(dead_code)]
pub async fn spawn_fake_sheets(data: FakeSheets) -> SheetsServer {
    let data = Arc::new(data);
    let log = Arc::new(Mutex::new(Vec::new()));
    let recorded = log.clone();

    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
            let data = data.clone();
            let log = recorded.clone();
            async move {
                let op = SheetsOp::classify(&method, uri.path());
                log.lock().unwrap().push(SheetsRequest {
                    op,
                    path: uri.path().to_string(),
                    query: uri.query().map(str::to_string),
                    authorization: headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                    body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                });

                if let Some(&status) = data.failures.get(&op) {
                    let status = StatusCode::from_u16(status).unwrap();
                    return (status, Json(json!({ "error": { "code": status.as_u16() } })));
                }
                match op {
                    SheetsOp::Lookup => {
                        let sheets: Vec<Value> = data
                            .sheets
                            .iter()
                            .map(|(id, title)| json!({ "properties": { "sheetId": id, "title": title } }))
                            .collect();
                        (StatusCode::OK, Json(json!({ "sheets": sheets })))
                    }
                    _ => (StatusCode::OK, Json(json!({}))),
                }
            }
        },
    );

    SheetsServer {
        base_url: serve_locally(app).await,
        log,
    }
}

#[allow(dead_code)]
async fn serve_locally(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake server");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Fake server failed");
    });

    format!("http://{}", addr)
}
