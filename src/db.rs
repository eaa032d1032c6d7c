// ==========================================
// 蛋鸡生产记录核心 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - 建表脚本集中在这里（幂等，可重复执行）
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前 schema 版本
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 建表 SQL
///
/// 派生字段（总蛋数 / 百分比 / 产蛋率 / 批次关联）不落库
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS production_record (
    id TEXT PRIMARY KEY,
    record_date TEXT NOT NULL,
    aviary TEXT NOT NULL,
    batch_id TEXT,
    clean_eggs INTEGER NOT NULL DEFAULT 0,
    dirty_eggs INTEGER NOT NULL DEFAULT 0,
    cracked_eggs INTEGER NOT NULL DEFAULT 0,
    floor_eggs INTEGER,
    birds INTEGER NOT NULL DEFAULT 0,
    egg_weight REAL,
    bird_weight REAL,
    mortality INTEGER NOT NULL DEFAULT 0,
    note TEXT
);

CREATE INDEX IF NOT EXISTS idx_production_record_key
    ON production_record (record_date, aviary);

CREATE TABLE IF NOT EXISTS characterization_snapshot (
    id TEXT PRIMARY KEY,
    snapshot_date TEXT NOT NULL,
    aviary TEXT NOT NULL,
    batch_id TEXT NOT NULL,
    age_weeks REAL NOT NULL,
    weight REAL NOT NULL,
    uniformity REAL NOT NULL,
    feathering TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_characterization_snapshot_key
    ON characterization_snapshot (aviary, snapshot_date);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (scope_id, key)
);
"#;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表（幂等），首次建库时写入 schema_version
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    if read_schema_version(conn)?.is_none() {
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [CURRENT_SCHEMA_VERSION],
        )?;
    }
    Ok(())
}

/// 读取 schema_version（表不存在或无记录时返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
