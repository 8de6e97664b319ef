use crate::error::ServiceError;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

// 선택 항목 기본값
pub const DEFAULT_ITEM: &str = "Featured Artwork";
pub const DEFAULT_CHARITY: &str = "Community Arts Foundation";
pub const DEFAULT_NOTES: &str = "No additional notes";

// 레거시 스키마에서 서비스가 기록하는 상태값
pub const SUBMITTED_STATUS: &str = "Submitted";

/// 서버 기준 현재 시각 (밀리초 단위로 절삭)
pub fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

// region:    --- Bid Amount
/// 입찰 금액
/// 숫자는 원본 그대로 보존하고, 문자열은 검증 없이 그대로 기록한다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BidAmount {
    Number(Number),
    Text(String),
}

impl BidAmount {
    /// 정수로 표현 가능한 값은 정수로 유지
    pub fn from_f64(value: f64) -> Self {
        BidAmount::Number(amount_number(value))
    }

    /// 숫자로 변환 (변환 불가능하면 None)
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            BidAmount::Number(n) => n.as_f64()?,
            BidAmount::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    pub fn to_cell(&self) -> Value {
        match self {
            BidAmount::Number(n) => Value::Number(n.clone()),
            BidAmount::Text(s) => Value::String(s.clone()),
        }
    }

    pub fn from_cell(cell: &Value) -> Self {
        match cell {
            Value::Number(n) => BidAmount::Number(n.clone()),
            other => BidAmount::Text(cell_text(other)),
        }
    }
}

/// 숫자가 아닌 스칼라(null, bool)는 텍스트로 기록하고 합계에서 제외
impl<'de> Deserialize<'de> for BidAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(BidAmount::Number(n)),
            v @ (Value::String(_) | Value::Bool(_) | Value::Null) => {
                Ok(BidAmount::Text(cell_text(&v)))
            }
            Value::Array(_) | Value::Object(_) => Err(serde::de::Error::custom(
                "bidAmount must be a number or text",
            )),
        }
    }
}

/// f64 금액을 JSON 숫자로 변환 (200.0 -> 200)
pub fn amount_number(value: f64) -> Number {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Number::from(value as i64)
    } else {
        Number::from_f64(value).unwrap_or_else(|| Number::from(0))
    }
}

/// 셀 값을 자유 텍스트로 변환
pub fn cell_text(cell: &Value) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
// endregion: --- Bid Amount

// region:    --- Bid Submission
/// 입찰 요청 본문 (원시 형태)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSubmission {
    #[serde(deserialize_with = "required_text")]
    full_name: String,
    #[serde(deserialize_with = "required_text")]
    email: String,
    #[serde(deserialize_with = "required_text")]
    phone: String,
    bid_amount: BidAmount,
    #[serde(default, deserialize_with = "optional_text")]
    item: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    charity: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    notes: Option<String>,
}

/// 정규화된 입찰 요청 (기본값 적용 완료)
#[derive(Debug, Clone, PartialEq)]
pub struct BidSubmission {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub bid_amount: BidAmount,
    pub item: String,
    pub charity: String,
    pub notes: String,
}

impl BidSubmission {
    /// 요청 본문 파싱 및 기본값 적용
    pub fn parse(body: &[u8]) -> Result<Self, ServiceError> {
        let raw: RawSubmission = serde_json::from_slice(body)
            .map_err(|e| ServiceError::MalformedInput(e.to_string()))?;

        Ok(Self {
            full_name: raw.full_name,
            email: raw.email,
            phone: raw.phone,
            bid_amount: raw.bid_amount,
            item: with_default(raw.item, DEFAULT_ITEM),
            charity: with_default(raw.charity, DEFAULT_CHARITY),
            notes: with_default(raw.notes, DEFAULT_NOTES),
        })
    }
}

// 빈 문자열도 누락으로 취급
fn with_default(value: Option<String>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => default.to_string(),
    }
}

fn required_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        v @ (Value::Number(_) | Value::Bool(_)) => Ok(v.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected text, found {other}"
        ))),
    }
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        v @ (Value::Number(_) | Value::Bool(_)) => Ok(Some(v.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected text, found {other}"
        ))),
    }
}
// endregion: --- Bid Submission

// region:    --- Bid Record
/// 원장의 한 행
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidRecord {
    pub timestamp: DateTime<Utc>,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub bid_amount: BidAmount,
    pub item: String,
    pub charity: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_bid: Option<BidAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl BidRecord {
    pub fn from_submission(submission: BidSubmission, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            full_name: submission.full_name,
            email: submission.email,
            phone: submission.phone,
            bid_amount: submission.bid_amount,
            item: submission.item,
            charity: submission.charity,
            notes: submission.notes,
            previous_bid: None,
            status: None,
        }
    }
}
// endregion: --- Bid Record
