/// Google Sheets 기반 원장
/// 1행이 헤더, 2행부터 데이터 행이다.
// region:    --- Imports
use super::{Ledger, Row};
use crate::bidding::model::cell_text;
use crate::error::ServiceError;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
// endregion: --- Imports

/// Sheets API values 응답
#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Row>,
}

pub struct SheetsLedger {
    client: Client,
    api_base: String,
    spreadsheet_id: String,
    sheet_name: String,
    access_token: String,
}

impl SheetsLedger {
    pub fn new(
        api_base: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
            access_token: access_token.into(),
        }
    }

    /// A1 표기 범위 (시트 이름은 항상 따옴표로 감싼다)
    fn range(&self, cells: &str) -> String {
        let quoted = self.sheet_name.replace('\'', "''");
        if cells.is_empty() {
            format!("'{quoted}'")
        } else {
            format!("'{quoted}'!{cells}")
        }
    }

    /// .../spreadsheets/{id}/values/{range}{suffix}
    fn values_url(&self, range: &str, suffix: &str) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| ServiceError::Storage(format!("invalid Sheets API base: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::Storage("Sheets API base cannot hold a path".to_string()))?
            .pop_if_empty()
            .push("spreadsheets")
            .push(&self.spreadsheet_id)
            .push("values")
            .push(&format!("{range}{suffix}"));
        Ok(url)
    }

    async fn get_values(&self, range: &str) -> Result<Vec<Row>, ServiceError> {
        let url = self.values_url(range, "")?;
        let body: ValueRange = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[("valueRenderOption", "UNFORMATTED_VALUE")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.values)
    }
}

#[async_trait]
impl Ledger for SheetsLedger {
    async fn header(&self) -> Result<Option<Vec<String>>, ServiceError> {
        let rows = self.get_values(&self.range("1:1")).await?;
        Ok(header_from_rows(rows))
    }

    async fn ensure_header(&self, columns: &[String]) -> Result<Vec<String>, ServiceError> {
        if let Some(existing) = self.header().await? {
            return Ok(existing);
        }

        let url = self.values_url(&self.range("A1"), "")?;
        self.client
            .put(url)
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "values": [columns] }))
            .send()
            .await?
            .error_for_status()?;
        info!(
            "{:<12} --> 헤더 행 생성: {}",
            "SheetsLedger", self.sheet_name
        );
        Ok(columns.to_vec())
    }

    async fn append(&self, row: Row) -> Result<(), ServiceError> {
        let url = self.values_url(&self.range("A1"), ":append")?;
        self.client
            .post(url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": [row] }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Row>, ServiceError> {
        let rows = self.get_values(&self.range("")).await?;
        Ok(rows.into_iter().skip(1).collect())
    }
}

// 첫 행이 비어 있으면 헤더 없음
fn header_from_rows(rows: Vec<Row>) -> Option<Vec<String>> {
    let first = rows.into_iter().next()?;
    let header: Vec<String> = first.iter().map(cell_text).collect();
    if header.iter().all(|c| c.trim().is_empty()) {
        None
    } else {
        Some(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bidding::commands::handle_submit_bid;
    use crate::bidding::LedgerPolicy;
    use crate::ledger::SchemaVariant;
    use crate::query::handlers::read_bids;
    use axum::body::Bytes;
    use axum::extract::{Path, RawQuery, State};
    use axum::http::{HeaderMap, Method, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::Router;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    fn ledger(sheet: &str) -> SheetsLedger {
        SheetsLedger::new(
            "https://sheets.googleapis.com/v4",
            "sheet-123",
            sheet,
            "token",
        )
    }

    #[test]
    fn append_url_targets_quoted_sheet() {
        let ledger = ledger("Bids");
        let url = ledger.values_url(&ledger.range("A1"), ":append").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet-123/values/'Bids'!A1:append"
        );
    }

    #[test]
    fn sheet_names_with_spaces_are_encoded() {
        let ledger = ledger("Silent Auction");
        let url = ledger.values_url(&ledger.range("1:1"), "").unwrap();
        assert!(url.path().ends_with("/values/'Silent%20Auction'!1:1"));
    }

    #[test]
    fn header_detection() {
        let empty: ValueRange = serde_json::from_str(r#"{"range":"'Bids'!A1:Z1"}"#).unwrap();
        assert_eq!(header_from_rows(empty.values), None);

        let blank = vec![vec![serde_json::json!(""), serde_json::json!("  ")]];
        assert_eq!(header_from_rows(blank), None);

        let present = vec![vec![serde_json::json!("Timestamp"), serde_json::json!("Full Name")]];
        assert_eq!(
            header_from_rows(present),
            Some(vec!["Timestamp".to_string(), "Full Name".to_string()])
        );
    }

    // region:    --- Local Sheets API stub

    #[derive(Debug, Clone)]
    struct SeenRequest {
        method: Method,
        range: String,
        query: String,
        authorization: Option<String>,
    }

    #[derive(Clone, Default)]
    struct StubSheet {
        rows: Arc<Mutex<Vec<Row>>>,
        seen: Arc<Mutex<Vec<SeenRequest>>>,
    }

    impl StubSheet {
        fn seeded(rows: Vec<Row>) -> Self {
            let sheet = Self::default();
            *sheet.rows.lock().unwrap() = rows;
            sheet
        }

        fn seen(&self, method: Method) -> Vec<SeenRequest> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .filter(|r| r.method == method)
                .cloned()
                .collect()
        }
    }

    /// values 엔드포인트 흉내 (GET 범위 조회, PUT 헤더 기록, POST 추가)
    async fn values_endpoint(
        State(sheet): State<StubSheet>,
        method: Method,
        Path((spreadsheet_id, range)): Path<(String, String)>,
        RawQuery(query): RawQuery,
        headers: HeaderMap,
        body: Bytes,
    ) -> Response {
        sheet.seen.lock().unwrap().push(SeenRequest {
            method: method.clone(),
            range: range.clone(),
            query: query.unwrap_or_default(),
            authorization: headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });

        if spreadsheet_id == "missing" {
            return (StatusCode::NOT_FOUND, "Requested entity was not found.").into_response();
        }

        let mut rows = sheet.rows.lock().unwrap();
        if method == Method::GET {
            let values: Vec<Row> = if range.ends_with("!1:1") {
                rows.iter().take(1).cloned().collect()
            } else {
                rows.clone()
            };
            if values.is_empty() {
                axum::Json(json!({ "range": range })).into_response()
            } else {
                axum::Json(json!({ "range": range, "values": values })).into_response()
            }
        } else {
            let incoming: ValueRange = match serde_json::from_slice(&body) {
                Ok(v) => v,
                Err(_) => return StatusCode::BAD_REQUEST.into_response(),
            };
            if method == Method::PUT {
                let header = incoming.values.into_iter().next().unwrap_or_default();
                if rows.is_empty() {
                    rows.push(header);
                } else {
                    rows[0] = header;
                }
            } else {
                rows.extend(incoming.values);
            }
            axum::Json(json!({ "spreadsheetId": spreadsheet_id })).into_response()
        }
    }

    async fn spawn_stub(sheet: StubSheet) -> String {
        let app = Router::new()
            .route(
                "/v4/spreadsheets/:spreadsheet_id/values/:range",
                get(values_endpoint).put(values_endpoint).post(values_endpoint),
            )
            .with_state(sheet);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v4")
    }

    // endregion: --- Local Sheets API stub

    #[tokio::test]
    async fn header_is_written_once_then_reused() {
        let sheet = StubSheet::default();
        let ledger = SheetsLedger::new(spawn_stub(sheet.clone()).await, "sheet-123", "Bids", "token");
        let columns = SchemaVariant::Standard.header();

        assert_eq!(ledger.header().await.unwrap(), None);
        assert_eq!(ledger.ensure_header(&columns).await.unwrap(), columns);
        assert_eq!(ledger.ensure_header(&columns).await.unwrap(), columns);
        assert_eq!(ledger.header().await.unwrap(), Some(columns));

        let puts = sheet.seen(Method::PUT);
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].range, "'Bids'!A1");
        assert_eq!(puts[0].query, "valueInputOption=RAW");
    }

    #[tokio::test]
    async fn append_inserts_rows_and_list_skips_header() {
        let sheet = StubSheet::default();
        let ledger = SheetsLedger::new(spawn_stub(sheet.clone()).await, "sheet-123", "Bids", "token");
        ledger
            .ensure_header(&SchemaVariant::Standard.header())
            .await
            .unwrap();

        ledger.append(vec![json!("2024-05-01T12:30:00.000Z"), json!("Jane Doe")]).await.unwrap();
        ledger.append(vec![json!("2024-05-01T12:31:00.000Z"), json!("John Roe")]).await.unwrap();

        let rows = ledger.list_all().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][1], json!("Jane Doe"));
        assert_eq!(rows[1][1], json!("John Roe"));

        let posts = sheet.seen(Method::POST);
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].range, "'Bids'!A1:append");
        assert_eq!(posts[0].query, "valueInputOption=RAW&insertDataOption=INSERT_ROWS");

        let gets = sheet.seen(Method::GET);
        assert!(gets.iter().any(|r| r.range == "'Bids'"));
        assert!(gets.iter().all(|r| r.query == "valueRenderOption=UNFORMATTED_VALUE"));
        assert!(sheet
            .seen
            .lock()
            .unwrap()
            .iter()
            .all(|r| r.authorization.as_deref() == Some("Bearer token")));
    }

    #[tokio::test]
    async fn submit_and_read_through_sheets() {
        let sheet = StubSheet::default();
        let ledger = SheetsLedger::new(spawn_stub(sheet.clone()).await, "sheet-123", "Bids", "token");
        let policy = LedgerPolicy::default();

        handle_submit_bid(
            br#"{"fullName":"Jane Doe","email":"j@x.com","phone":"555-1111","bidAmount":250}"#,
            &ledger,
            &policy,
        )
        .await
        .unwrap();

        let view = read_bids(&ledger, &policy).await.unwrap();
        assert_eq!(view.summary.total_bids, 1);
        assert_eq!(view.summary.highest_bid, 250.0);
        assert_eq!(view.data[0].full_name, "Jane Doe");
        let header: Row = SchemaVariant::Standard
            .header()
            .into_iter()
            .map(Value::from)
            .collect();
        assert_eq!(sheet.rows.lock().unwrap()[0], header);
    }

    #[tokio::test]
    async fn serial_date_rows_from_older_sheets_are_readable() {
        let sheet = StubSheet::seeded(vec![
            SchemaVariant::Legacy.header().into_iter().map(Value::from).collect(),
            vec![
                json!(45413.520833333336),
                json!("Jane Doe"),
                json!("j@x.com"),
                json!("555-1111"),
                json!(250),
                json!(200),
                json!("Featured Artwork"),
                json!("Community Arts Foundation"),
                json!("No additional notes"),
                json!("Submitted"),
            ],
        ]);
        let ledger = SheetsLedger::new(spawn_stub(sheet).await, "sheet-123", "Bids", "token");
        let policy = LedgerPolicy {
            schema: SchemaVariant::Legacy,
            ..LedgerPolicy::default()
        };

        let view = read_bids(&ledger, &policy).await.unwrap();
        assert_eq!(view.summary.total_bids, 1);
        assert_eq!(
            view.data[0].timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "2024-05-01T12:30:00.000Z"
        );
    }

    #[tokio::test]
    async fn api_errors_surface_as_storage_errors() {
        let ledger = SheetsLedger::new(
            spawn_stub(StubSheet::default()).await,
            "missing",
            "Bids",
            "token",
        );

        assert!(matches!(ledger.header().await, Err(ServiceError::Storage(_))));
        assert!(matches!(
            ledger.append(vec![json!("x")]).await,
            Err(ServiceError::Storage(_))
        ));
        assert!(matches!(ledger.list_all().await, Err(ServiceError::Storage(_))));
    }
}
