// region:    --- Imports
use crate::bidding::LedgerPolicy;
use crate::config::{Config, LedgerBackend};
use crate::database::DatabaseManager;
use crate::ledger::{Ledger, MemoryLedger, PostgresLedger, SheetsLedger};
use std::sync::Arc;
use tracing::info;
// endregion: --- Imports

/// 요청 간 공유 상태
/// 원장 핸들을 재사용하지만 정합성은 그에 의존하지 않는다.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<dyn Ledger>,
    pub policy: LedgerPolicy,
    pub contact_phone: Option<String>,
}

impl AppState {
    pub fn new(ledger: Arc<dyn Ledger>, policy: LedgerPolicy) -> Self {
        Self {
            ledger,
            policy,
            contact_phone: None,
        }
    }

    pub fn with_contact_phone(mut self, phone: impl Into<String>) -> Self {
        self.contact_phone = Some(phone.into());
        self
    }

    /// 설정에 따라 원장 저장소 생성
    pub async fn from_config(config: &Config) -> Result<Self, Box<dyn std::error::Error>> {
        let ledger: Arc<dyn Ledger> = match &config.backend {
            LedgerBackend::Memory => {
                info!("{:<12} --> 메모리 원장 사용", "State");
                Arc::new(MemoryLedger::new())
            }
            LedgerBackend::Postgres {
                database_url,
                max_connections,
            } => {
                let db_manager =
                    Arc::new(DatabaseManager::connect(database_url, *max_connections).await?);
                db_manager.initialize_database().await?;
                info!("{:<12} --> Postgres 원장 사용: {}", "State", config.ledger_id);
                Arc::new(PostgresLedger::new(db_manager, config.ledger_id.clone()))
            }
            LedgerBackend::Sheets {
                api_base,
                spreadsheet_id,
                sheet_name,
                access_token,
            } => {
                info!(
                    "{:<12} --> Google Sheets 원장 사용: {}/{}",
                    "State", spreadsheet_id, sheet_name
                );
                Arc::new(SheetsLedger::new(
                    api_base.clone(),
                    spreadsheet_id.clone(),
                    sheet_name.clone(),
                    access_token.clone(),
                ))
            }
        };

        Ok(Self {
            ledger,
            policy: config.policy,
            contact_phone: config.contact_phone.clone(),
        })
    }
}
