// region:    --- Imports
use super::summary::{summarize, SummaryView};
use crate::bidding::model::{now_millis, BidRecord};
use crate::bidding::LedgerPolicy;
use crate::error::ServiceError;
use crate::ledger::{Ledger, SchemaVariant};
use serde::Serialize;
use tracing::info;

// endregion: --- Imports

/// 입찰 조회 결과
#[derive(Debug, Clone, Serialize)]
pub struct BidsView {
    pub data: Vec<BidRecord>,
    pub summary: SummaryView,
}

// region:    --- Query Handlers

/// 원장 전체 레코드 조회 (원장 순서 유지)
pub async fn load_records<L>(
    ledger: &L,
    schema: SchemaVariant,
) -> Result<Vec<BidRecord>, ServiceError>
where
    L: Ledger + ?Sized,
{
    let Some(header) = ledger.header().await? else {
        info!("{:<12} --> 헤더 없음: 빈 원장", "Query");
        return Ok(Vec::new());
    };
    schema.check_header(&header)?;

    ledger
        .list_all()
        .await?
        .iter()
        .enumerate()
        .map(|(index, row)| schema.decode(index, row))
        .collect()
}

/// 입찰 목록 + 요약 조회
pub async fn read_bids<L>(ledger: &L, policy: &LedgerPolicy) -> Result<BidsView, ServiceError>
where
    L: Ledger + ?Sized,
{
    info!("{:<12} --> 입찰 목록 조회", "Query");
    let records = load_records(ledger, policy.schema).await?;
    let summary = summarize(&records, policy.starting_bid, now_millis());
    info!(
        "{:<12} --> 입찰 {}건, 최고 입찰가 {}",
        "Query", summary.total_bids, summary.highest_bid
    );

    Ok(BidsView {
        data: records,
        summary,
    })
}

// endregion: --- Query Handlers
