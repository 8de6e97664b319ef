/// 입찰 원장 저장소 추상화
/// 고정 식별자로 지정되는 추가 전용(append-only) 표 형태 저장소
///
/// 동시 쓰기 시 append의 원자성은 각 저장소 구현의 보장에 의존한다.
/// 이 서비스는 별도의 상호 배제나 트랜잭션을 제공하지 않는다.
// region:    --- Imports
use crate::error::ServiceError;
use async_trait::async_trait;
use serde_json::Value;
// endregion: --- Imports

// region:    --- Modules
pub mod memory;
pub mod postgres;
pub mod schema;
pub mod sheets;
// endregion: --- Modules

pub use memory::MemoryLedger;
pub use postgres::PostgresLedger;
pub use schema::SchemaVariant;
pub use sheets::SheetsLedger;

/// 원장의 한 행 (순서가 있는 셀 목록)
pub type Row = Vec<Value>;

// region:    --- Ledger Trait
/// 원장 트레이트
#[async_trait]
pub trait Ledger: Send + Sync {
    /// 현재 헤더 행 (없으면 None)
    async fn header(&self) -> Result<Option<Vec<String>>, ServiceError>;

    /// 헤더가 없으면 기록하고, 유효한 헤더를 반환
    async fn ensure_header(&self, columns: &[String]) -> Result<Vec<String>, ServiceError>;

    /// 데이터 행 추가 (수정/삭제 없음)
    async fn append(&self, row: Row) -> Result<(), ServiceError>;

    /// 모든 데이터 행을 원장 순서대로 조회 (헤더 제외)
    async fn list_all(&self) -> Result<Vec<Row>, ServiceError>;
}
// endregion: --- Ledger Trait
