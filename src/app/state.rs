// ==========================================
// 蛋鸡生产记录核心 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接、仓储、配置与导入器
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::production::ComputedRecord;
use crate::engine::period_summary::{summarize_by_fortnight, PeriodSummary};
use crate::engine::report_filter::{apply_filter, FilterSpec};
use crate::engine::temporal::today;
use crate::exporter::{export_characterizations, export_production, ExportResult};
use crate::importer::{ImportResult, RecordImporterImpl};
use crate::repository::{RecordRepository, SqliteRecordRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "AVIARY_RECORDS_DB_PATH";

/// 应用状态
///
/// 仓储与配置共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 导入器（持有仓储与配置）
    pub importer: RecordImporterImpl<SqliteRecordRepository, ConfigManager>,
}

impl AppState {
    /// 创建新的 AppState 实例
    ///
    /// # 说明
    /// 1. 打开连接并应用统一 PRAGMA
    /// 2. 建表（幂等）
    /// 3. 仓储 / 配置共享连接
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        let repo = SqliteRecordRepository::from_connection(conn.clone());
        let config =
            ConfigManager::from_connection(conn).map_err(|e| format!("配置初始化失败: {}", e))?;

        Ok(Self {
            db_path,
            importer: RecordImporterImpl::new(repo, config),
        })
    }

    /// 仓储引用
    pub fn repository(&self) -> &SqliteRecordRepository {
        self.importer.repository()
    }

    /// 派生全部日产记录
    pub fn computed_records(&self) -> ImportResult<Vec<ComputedRecord>> {
        self.importer.computed_records()
    }

    /// 日产记录导出文本
    pub fn export_production_text(&self) -> ExportResult<String> {
        let records = self.repository().load_production()?;
        let snapshots = self.repository().load_characterizations()?;
        export_production(&crate::engine::derive_records(&records, &snapshots))
    }

    /// 特征快照导出文本
    pub fn export_characterization_text(&self) -> ExportResult<String> {
        let snapshots = self.repository().load_characterizations()?;
        export_characterizations(&snapshots)
    }

    /// 按筛选条件汇总半月周期
    pub fn period_summary(&self, filter: &FilterSpec) -> ImportResult<Vec<PeriodSummary>> {
        let computed = self.computed_records()?;
        let selected: Vec<ComputedRecord> = apply_filter(&computed, filter, today())
            .into_iter()
            .cloned()
            .collect();
        Ok(summarize_by_fortnight(&selected))
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 AVIARY_RECORDS_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./aviary_records.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("aviary-records");
        // 确保目录存在；失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("aviary_records.db");
        }
    }

    path.to_string_lossy().to_string()
}
