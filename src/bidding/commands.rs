/// 입찰 관련 커맨드 처리
/// 1. 입찰 접수
///
/// 접수는 멱등이 아니다. 같은 내용을 다시 보내면 새 행이 추가된다.
/// 서버는 입찰가가 현재 최고가보다 높은지 검사하지 않는다.
// region:    --- Imports
use super::model::{now_millis, BidAmount, BidRecord, BidSubmission, SUBMITTED_STATUS};
use super::LedgerPolicy;
use crate::error::ServiceError;
use crate::ledger::Ledger;
use crate::query::handlers::load_records;
use crate::query::summary::highest_bid;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
// endregion: --- Imports

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Bid submitted successfully";

// region:    --- Receipt
/// 입찰 접수 결과
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub bid_amount: BidAmount,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
// endregion: --- Receipt

// region:    --- Commands

/// 1. 입찰 접수
pub async fn handle_submit_bid<L>(
    body: &[u8],
    ledger: &L,
    policy: &LedgerPolicy,
) -> Result<SubmitReceipt, ServiceError>
where
    L: Ledger + ?Sized,
{
    // 파싱 실패 시 원장에 아무것도 쓰지 않는다
    let submission = BidSubmission::parse(body)?;
    info!(
        "{:<12} --> 입찰 접수 처리 시작: {} / {:?}",
        "Command", submission.full_name, submission.bid_amount
    );

    // 최초 기록 시 헤더 생성
    let header = ledger.ensure_header(&policy.schema.header()).await?;
    policy.schema.check_header(&header)?;

    let previous_bid = if policy.schema.tracks_previous_bid() {
        let records = load_records(ledger, policy.schema).await?;
        Some(BidAmount::from_f64(highest_bid(&records, policy.starting_bid)))
    } else {
        None
    };

    let mut record = BidRecord::from_submission(submission, now_millis());
    if previous_bid.is_some() {
        record.previous_bid = previous_bid;
        record.status = Some(SUBMITTED_STATUS.to_string());
    }

    ledger.append(policy.schema.encode(&record)).await?;
    info!(
        "{:<12} --> 입찰 기록 완료: {}",
        "Command", record.timestamp
    );

    Ok(SubmitReceipt {
        bid_amount: record.bid_amount,
        message: SUBMIT_SUCCESS_MESSAGE.to_string(),
        timestamp: record.timestamp,
    })
}

// endregion: --- Commands
