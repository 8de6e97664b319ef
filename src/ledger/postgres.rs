// region:    --- Imports
use super::{Ledger, Row};
use crate::database::{queries, DatabaseManager};
use crate::error::ServiceError;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::Row as _;
use std::sync::Arc;
use tracing::info;
// endregion: --- Imports

/// Postgres 기반 원장
/// ledger_id 하나가 스프레드시트 한 장에 해당한다.
pub struct PostgresLedger {
    db_manager: Arc<DatabaseManager>,
    ledger_id: String,
}

impl PostgresLedger {
    pub fn new(db_manager: Arc<DatabaseManager>, ledger_id: impl Into<String>) -> Self {
        Self {
            db_manager,
            ledger_id: ledger_id.into(),
        }
    }
}

#[async_trait]
impl Ledger for PostgresLedger {
    async fn header(&self) -> Result<Option<Vec<String>>, ServiceError> {
        let row = sqlx::query(queries::GET_LEDGER_HEADER)
            .bind(&self.ledger_id)
            .fetch_optional(&*self.db_manager.pool)
            .await?;

        Ok(match row {
            Some(row) => Some(row.try_get::<Vec<String>, _>("columns")?),
            None => None,
        })
    }

    async fn ensure_header(&self, columns: &[String]) -> Result<Vec<String>, ServiceError> {
        let ledger_id = self.ledger_id.clone();
        let columns = columns.to_vec();

        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let inserted = sqlx::query(queries::INSERT_LEDGER_HEADER)
                        .bind(&ledger_id)
                        .bind(&columns)
                        .execute(&mut **tx)
                        .await?;
                    if inserted.rows_affected() > 0 {
                        info!("{:<12} --> 헤더 행 생성: {}", "PgLedger", ledger_id);
                    }

                    let row = sqlx::query(queries::GET_LEDGER_HEADER)
                        .bind(&ledger_id)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok::<_, ServiceError>(row.try_get::<Vec<String>, _>("columns")?)
                })
            })
            .await
    }

    async fn append(&self, row: Row) -> Result<(), ServiceError> {
        sqlx::query(queries::APPEND_LEDGER_ROW)
            .bind(&self.ledger_id)
            .bind(Json(row))
            .execute(&*self.db_manager.pool)
            .await?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<Row>, ServiceError> {
        let rows = sqlx::query(queries::GET_LEDGER_ROWS)
            .bind(&self.ledger_id)
            .fetch_all(&*self.db_manager.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let Json(cells) = row.try_get::<Json<Row>, _>("cells")?;
                Ok::<_, ServiceError>(cells)
            })
            .collect()
    }
}
