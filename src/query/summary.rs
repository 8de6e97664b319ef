/// 원장 요약 (조회 시마다 새로 계산, 저장하지 않음)
// region:    --- Imports
use crate::bidding::model::{amount_number, BidRecord};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
// endregion: --- Imports

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    pub total_bids: usize,
    #[serde(serialize_with = "serialize_amount")]
    pub highest_bid: f64,
    pub last_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_bid_time: Option<DateTime<Utc>>,
}

fn serialize_amount<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    amount_number(*value).serialize(serializer)
}

/// 최고 입찰가 = max(시작가, 숫자로 변환 가능한 모든 입찰가)
pub fn highest_bid(records: &[BidRecord], starting_bid: f64) -> f64 {
    records
        .iter()
        .filter_map(|r| r.bid_amount.as_number())
        .fold(starting_bid, f64::max)
}

pub fn summarize(records: &[BidRecord], starting_bid: f64, now: DateTime<Utc>) -> SummaryView {
    SummaryView {
        total_bids: records.len(),
        highest_bid: highest_bid(records, starting_bid),
        last_updated: now,
        latest_bid_time: records.iter().map(|r| r.timestamp).max(),
    }
}
