use crate::bidding::{LedgerPolicy, DEFAULT_STARTING_BID};
use crate::error::ConfigError;
use std::{env, fmt::Display, str::FromStr};
use tracing::info;

pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4";

/// 원장 저장소 선택
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerBackend {
    Memory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    Sheets {
        api_base: String,
        spreadsheet_id: String,
        sheet_name: String,
        access_token: String,
    },
}

/// CORS 헤더 값 (모든 응답에 그대로 부착)
#[derive(Debug, Clone, PartialEq)]
pub struct CorsConfig {
    pub enabled: bool,
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
    pub max_age: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_origin: "*".to_string(),
            allow_methods: "GET, POST, OPTIONS".to_string(),
            allow_headers: "Content-Type, Authorization".to_string(),
            max_age: "3600".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub ledger_id: String,
    pub backend: LedgerBackend,
    pub policy: LedgerPolicy,
    pub cors: CorsConfig,
    pub contact_phone: Option<String>,
    pub body_limit: usize,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정 구성 (테스트에서 환경 변수 대신 사용)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ledger_id: String = try_load(&lookup, "LEDGER_ID", "bids")?;

        let backend_name: String = try_load(&lookup, "LEDGER_BACKEND", "memory")?;
        let backend = match backend_name.trim().to_ascii_lowercase().as_str() {
            "memory" => LedgerBackend::Memory,
            "postgres" => LedgerBackend::Postgres {
                database_url: required(&lookup, "DATABASE_URL")?,
                max_connections: try_load(&lookup, "DATABASE_MAX_CONNECTIONS", "5")?,
            },
            "sheets" => LedgerBackend::Sheets {
                api_base: try_load(&lookup, "SHEETS_API_BASE", DEFAULT_SHEETS_API_BASE)?,
                spreadsheet_id: required(&lookup, "SHEETS_SPREADSHEET_ID")?,
                sheet_name: try_load(&lookup, "SHEETS_SHEET_NAME", "Bids")?,
                access_token: required(&lookup, "SHEETS_ACCESS_TOKEN")?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: "LEDGER_BACKEND",
                    value: other.to_string(),
                    reason: "expected memory, postgres or sheets".to_string(),
                })
            }
        };

        let starting_bid: f64 =
            try_load(&lookup, "STARTING_BID", &DEFAULT_STARTING_BID.to_string())?;
        if !starting_bid.is_finite() {
            return Err(ConfigError::Invalid {
                key: "STARTING_BID",
                value: starting_bid.to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        let defaults = CorsConfig::default();
        let cors = CorsConfig {
            enabled: try_load(&lookup, "CORS_ENABLED", "true")?,
            allow_origin: try_load(&lookup, "CORS_ALLOW_ORIGIN", &defaults.allow_origin)?,
            allow_methods: try_load(&lookup, "CORS_ALLOW_METHODS", &defaults.allow_methods)?,
            allow_headers: try_load(&lookup, "CORS_ALLOW_HEADERS", &defaults.allow_headers)?,
            max_age: try_load(&lookup, "CORS_MAX_AGE", &defaults.max_age)?,
        };

        Ok(Self {
            port: try_load(&lookup, "PORT", "3000")?,
            ledger_id,
            backend,
            policy: LedgerPolicy {
                schema: try_load(&lookup, "LEDGER_SCHEMA", "standard")?,
                starting_bid,
            },
            cors,
            contact_phone: lookup("CONTACT_PHONE").filter(|p| !p.trim().is_empty()),
            body_limit: try_load(&lookup, "BODY_LIMIT_BYTES", "1048576")?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.clone(),
        reason: e.to_string(),
    })
}

fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}
