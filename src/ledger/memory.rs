// region:    --- Imports
use super::{Ledger, Row};
use crate::error::ServiceError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;
// endregion: --- Imports

#[derive(Default)]
struct Sheet {
    header: Option<Vec<String>>,
    rows: Vec<Row>,
}

/// 프로세스 내 원장
/// 하나의 뮤텍스로 헤더와 행을 함께 보호한다.
#[derive(Default)]
pub struct MemoryLedger {
    sheet: Mutex<Sheet>,
    accesses: AtomicUsize,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 원장에 접근한 횟수
    pub fn accesses(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Sheet>, ServiceError> {
        self.accesses.fetch_add(1, Ordering::SeqCst);
        self.sheet
            .lock()
            .map_err(|_| ServiceError::Storage("in-memory ledger lock poisoned".to_string()))
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn header(&self) -> Result<Option<Vec<String>>, ServiceError> {
        Ok(self.lock()?.header.clone())
    }

    async fn ensure_header(&self, columns: &[String]) -> Result<Vec<String>, ServiceError> {
        let mut sheet = self.lock()?;
        let header = sheet.header.get_or_insert_with(|| {
            debug!("{:<12} --> 헤더 행 생성", "MemoryLedger");
            columns.to_vec()
        });
        Ok(header.clone())
    }

    async fn append(&self, row: Row) -> Result<(), ServiceError> {
        self.lock()?.rows.push(row);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Row>, ServiceError> {
        Ok(self.lock()?.rows.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn header_is_written_once() {
        let ledger = MemoryLedger::new();
        assert_eq!(ledger.header().await.unwrap(), None);

        let first = vec!["A".to_string()];
        let second = vec!["B".to_string()];
        assert_eq!(ledger.ensure_header(&first).await.unwrap(), first);
        assert_eq!(ledger.ensure_header(&second).await.unwrap(), first);
    }

    #[tokio::test]
    async fn rows_keep_append_order() {
        let ledger = MemoryLedger::new();
        ledger.append(vec![json!(1)]).await.unwrap();
        ledger.append(vec![json!(2)]).await.unwrap();
        ledger.append(vec![json!(1)]).await.unwrap();

        assert_eq!(
            ledger.list_all().await.unwrap(),
            vec![vec![json!(1)], vec![json!(2)], vec![json!(1)]]
        );
        assert_eq!(ledger.accesses(), 4);
    }
}
