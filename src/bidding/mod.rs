pub mod commands;
pub mod model;

use crate::ledger::SchemaVariant;

// 최초 시작가
pub const DEFAULT_STARTING_BID: f64 = 200.0;

/// 원장 처리 정책 (스키마 변형, 시작가)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LedgerPolicy {
    pub schema: SchemaVariant,
    pub starting_bid: f64,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            schema: SchemaVariant::Standard,
            starting_bid: DEFAULT_STARTING_BID,
        }
    }
}
