/// 원장 헤더 조회
pub const GET_LEDGER_HEADER: &str = "SELECT columns FROM ledger_headers WHERE ledger_id = $1";

/// 원장 헤더 생성 (이미 있으면 무시)
pub const INSERT_LEDGER_HEADER: &str = r#"
    INSERT INTO ledger_headers (ledger_id, columns)
    VALUES ($1, $2)
    ON CONFLICT (ledger_id) DO NOTHING
"#;

/// 원장 행 추가
pub const APPEND_LEDGER_ROW: &str = "INSERT INTO ledger_rows (ledger_id, cells) VALUES ($1, $2)";

/// 원장 전체 행 조회
pub const GET_LEDGER_ROWS: &str = r#"
    SELECT cells
    FROM ledger_rows
    WHERE ledger_id = $1
    ORDER BY id ASC
"#;
