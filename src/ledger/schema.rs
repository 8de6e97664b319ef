/// 원장 컬럼 스키마
/// 표준(8컬럼)과 레거시(10컬럼) 두 가지 변형을 하나의 코드 경로로 처리한다.
/// 하나의 원장에 두 변형을 섞어 쓰지 않는다.
// region:    --- Imports
use super::Row;
use crate::bidding::model::{cell_text, BidAmount, BidRecord};
use crate::error::ServiceError;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::str::FromStr;
// endregion: --- Imports

const STANDARD_COLUMNS: &[&str] = &[
    "Timestamp",
    "Full Name",
    "Email",
    "Phone",
    "Bid Amount",
    "Item",
    "Charity",
    "Notes",
];

const LEGACY_COLUMNS: &[&str] = &[
    "Timestamp",
    "Full Name",
    "Email",
    "Phone",
    "Bid Amount",
    "Previous Bid",
    "Item",
    "Charity",
    "Notes",
    "Status",
];

static EMPTY_CELL: Value = Value::Null;

// 스프레드시트 날짜 일련번호 기준일(1899-12-30T00:00:00Z)의 유닉스 밀리초
const SERIAL_EPOCH_MILLIS: i64 = -2_209_161_600_000;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVariant {
    Standard,
    Legacy,
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(SchemaVariant::Standard),
            "legacy" => Ok(SchemaVariant::Legacy),
            other => Err(format!("unknown schema variant '{other}'")),
        }
    }
}

impl SchemaVariant {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            SchemaVariant::Standard => STANDARD_COLUMNS,
            SchemaVariant::Legacy => LEGACY_COLUMNS,
        }
    }

    pub fn header(&self) -> Vec<String> {
        self.columns().iter().map(|c| c.to_string()).collect()
    }

    /// 직전 최고 입찰가 컬럼 보유 여부
    pub fn tracks_previous_bid(&self) -> bool {
        matches!(self, SchemaVariant::Legacy)
    }

    /// 기존 헤더가 설정된 스키마와 일치하는지 확인
    pub fn check_header(&self, found: &[String]) -> Result<(), ServiceError> {
        let expected = self.header();
        if found == expected.as_slice() {
            Ok(())
        } else {
            Err(ServiceError::SchemaMismatch {
                expected,
                found: found.to_vec(),
            })
        }
    }

    /// 레코드 -> 행
    pub fn encode(&self, record: &BidRecord) -> Row {
        let timestamp = Value::String(record.timestamp.to_rfc3339_opts(
            chrono::SecondsFormat::Millis,
            true,
        ));

        match self {
            SchemaVariant::Standard => vec![
                timestamp,
                text(&record.full_name),
                text(&record.email),
                text(&record.phone),
                record.bid_amount.to_cell(),
                text(&record.item),
                text(&record.charity),
                text(&record.notes),
            ],
            SchemaVariant::Legacy => vec![
                timestamp,
                text(&record.full_name),
                text(&record.email),
                text(&record.phone),
                record.bid_amount.to_cell(),
                record
                    .previous_bid
                    .as_ref()
                    .map(BidAmount::to_cell)
                    .unwrap_or(Value::Null),
                text(&record.item),
                text(&record.charity),
                text(&record.notes),
                text(record.status.as_deref().unwrap_or_default()),
            ],
        }
    }

    /// 행 -> 레코드 (뒤쪽 누락 셀은 빈 문자열)
    pub fn decode(&self, index: usize, row: &Row) -> Result<BidRecord, ServiceError> {
        let cell = |i: usize| row.get(i).unwrap_or(&EMPTY_CELL);
        let timestamp = parse_timestamp(cell(0)).ok_or_else(|| {
            ServiceError::Storage(format!(
                "row {} has an unreadable timestamp: {}",
                index + 1,
                cell(0)
            ))
        })?;

        let record = match self {
            SchemaVariant::Standard => BidRecord {
                timestamp,
                full_name: cell_text(cell(1)),
                email: cell_text(cell(2)),
                phone: cell_text(cell(3)),
                bid_amount: BidAmount::from_cell(cell(4)),
                item: cell_text(cell(5)),
                charity: cell_text(cell(6)),
                notes: cell_text(cell(7)),
                previous_bid: None,
                status: None,
            },
            SchemaVariant::Legacy => BidRecord {
                timestamp,
                full_name: cell_text(cell(1)),
                email: cell_text(cell(2)),
                phone: cell_text(cell(3)),
                bid_amount: BidAmount::from_cell(cell(4)),
                previous_bid: non_empty(cell(5)).map(BidAmount::from_cell),
                item: cell_text(cell(6)),
                charity: cell_text(cell(7)),
                notes: cell_text(cell(8)),
                status: non_empty(cell(9)).map(cell_text),
            },
        };
        Ok(record)
    }
}

fn text(s: &str) -> Value {
    Value::String(s.to_string())
}

/// RFC 3339 문자열 또는 스프레드시트 날짜 일련번호 (UTC 기준으로 해석)
fn parse_timestamp(cell: &Value) -> Option<DateTime<Utc>> {
    match cell {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => {
            let days = n.as_f64().filter(|d| d.is_finite())?;
            let offset = (days * MILLIS_PER_DAY).round();
            if offset.abs() > i64::MAX as f64 / 2.0 {
                return None;
            }
            let millis = SERIAL_EPOCH_MILLIS.checked_add(offset as i64)?;
            Utc.timestamp_millis_opt(millis).single()
        }
        _ => None,
    }
}

fn non_empty(cell: &Value) -> Option<&Value> {
    match cell {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bidding::model::{BidSubmission, SUBMITTED_STATUS};
    use serde_json::json;

    fn record() -> BidRecord {
        let sub = BidSubmission::parse(
            br#"{"fullName":"Jane Doe","email":"j@x.com","phone":"555-1111","bidAmount":250}"#,
        )
        .unwrap();
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        BidRecord::from_submission(sub, at)
    }

    #[test]
    fn standard_layout_has_eight_columns() {
        let row = SchemaVariant::Standard.encode(&record());
        assert_eq!(SchemaVariant::Standard.columns().len(), 8);
        assert_eq!(row.len(), 8);
        assert_eq!(row[0], json!("2024-05-01T12:30:00.000Z"));
        assert_eq!(row[4], json!(250));
        assert_eq!(SchemaVariant::Standard.decode(0, &row).unwrap(), record());
    }

    #[test]
    fn legacy_layout_carries_previous_bid_and_status() {
        let mut rec = record();
        rec.previous_bid = Some(BidAmount::from_f64(200.0));
        rec.status = Some(SUBMITTED_STATUS.to_string());

        let row = SchemaVariant::Legacy.encode(&rec);
        assert_eq!(row.len(), 10);
        assert_eq!(row[5], json!(200));
        assert_eq!(row[9], json!("Submitted"));
        assert_eq!(SchemaVariant::Legacy.decode(0, &row).unwrap(), rec);
    }

    #[test]
    fn short_rows_decode_with_empty_cells() {
        let row = vec![json!("2024-05-01T12:30:00Z"), json!("Only Name")];
        let rec = SchemaVariant::Standard.decode(0, &row).unwrap();
        assert_eq!(rec.full_name, "Only Name");
        assert_eq!(rec.notes, "");
        assert_eq!(rec.bid_amount, BidAmount::Text(String::new()));
    }

    #[test]
    fn unreadable_timestamp_is_a_storage_error() {
        let row = vec![json!("yesterday")];
        assert!(matches!(
            SchemaVariant::Standard.decode(3, &row),
            Err(ServiceError::Storage(msg)) if msg.contains("row 4")
        ));
    }

    #[test]
    fn serial_date_timestamps_are_read_as_utc() {
        let row = vec![json!(45413.520833333336), json!("Jane Doe")];
        let rec = SchemaVariant::Standard.decode(0, &row).unwrap();
        assert_eq!(rec.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap());

        let midnight = vec![json!(45413)];
        let rec = SchemaVariant::Standard.decode(0, &midnight).unwrap();
        assert_eq!(rec.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn non_date_cells_are_still_rejected() {
        for cell in [json!(true), json!(null), json!(1e300)] {
            assert!(matches!(
                SchemaVariant::Standard.decode(0, &vec![cell]),
                Err(ServiceError::Storage(_))
            ));
        }
    }

    #[test]
    fn header_mismatch_is_rejected() {
        let legacy = SchemaVariant::Legacy.header();
        assert!(SchemaVariant::Legacy.check_header(&legacy).is_ok());
        assert!(matches!(
            SchemaVariant::Standard.check_header(&legacy),
            Err(ServiceError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn variant_from_config_string() {
        assert_eq!("Legacy".parse::<SchemaVariant>(), Ok(SchemaVariant::Legacy));
        assert!("v3".parse::<SchemaVariant>().is_err());
    }
}
