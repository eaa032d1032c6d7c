// ==========================================
// 蛋鸡生产记录核心 - 记录集合仓储（SQLite 实现）
// ==========================================
// 表: production_record / characterization_snapshot
// 写入: 整体替换（DELETE + INSERT，单事务）
// 红线: Repository 不含业务逻辑，只负责数据访问
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::characterization::CharacterizationSnapshot;
use crate::domain::production::ProductionRecord;
use crate::domain::types::{Aviary, FeatheringQuality};
use crate::engine::temporal::ISO_DATE_FORMAT;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_repo::RecordRepository;
use chrono::NaiveDate;
use rusqlite::{params, Connection, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

// ==========================================
// SqliteRecordRepository
// ==========================================
pub struct SqliteRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRecordRepository {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（表结构需已由 db::init_schema 创建）
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn commit(tx: Transaction<'_>) -> RepositoryResult<()> {
        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))
    }
}

// ==========================================
// 行 ↔ 领域对象
// ==========================================

fn parse_date(field: &str, raw: &str) -> RepositoryResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT).map_err(|e| RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("{}: {}", raw, e),
    })
}

fn parse_aviary(raw: &str) -> RepositoryResult<Aviary> {
    Aviary::from_code(raw).ok_or_else(|| RepositoryError::FieldValueError {
        field: "aviary".to_string(),
        message: format!("未知鸡舍编码: {}", raw),
    })
}

fn parse_feathering(raw: &str) -> RepositoryResult<FeatheringQuality> {
    FeatheringQuality::from_code(raw).ok_or_else(|| RepositoryError::FieldValueError {
        field: "feathering".to_string(),
        message: format!("未知羽毛评级编码: {}", raw),
    })
}

/// production_record 原始行
struct ProductionRow {
    id: String,
    record_date: String,
    aviary: String,
    batch_id: Option<String>,
    clean_eggs: u32,
    dirty_eggs: u32,
    cracked_eggs: u32,
    floor_eggs: Option<u32>,
    birds: u32,
    egg_weight: Option<f64>,
    bird_weight: Option<f64>,
    mortality: u32,
    note: Option<String>,
}

impl ProductionRow {
    fn into_domain(self) -> RepositoryResult<ProductionRecord> {
        Ok(ProductionRecord {
            date: parse_date("record_date", &self.record_date)?,
            aviary: parse_aviary(&self.aviary)?,
            id: self.id,
            batch_id: self.batch_id,
            clean_eggs: self.clean_eggs,
            dirty_eggs: self.dirty_eggs,
            cracked_eggs: self.cracked_eggs,
            floor_eggs: self.floor_eggs,
            birds: self.birds,
            egg_weight: self.egg_weight,
            bird_weight: self.bird_weight,
            mortality: self.mortality,
            note: self.note,
        })
    }
}

/// characterization_snapshot 原始行
struct SnapshotRow {
    id: String,
    snapshot_date: String,
    aviary: String,
    batch_id: String,
    age_weeks: f64,
    weight: f64,
    uniformity: f64,
    feathering: String,
}

impl SnapshotRow {
    fn into_domain(self) -> RepositoryResult<CharacterizationSnapshot> {
        Ok(CharacterizationSnapshot {
            date: parse_date("snapshot_date", &self.snapshot_date)?,
            aviary: parse_aviary(&self.aviary)?,
            feathering: parse_feathering(&self.feathering)?,
            id: self.id,
            batch_id: self.batch_id,
            age_weeks: self.age_weeks,
            weight: self.weight,
            uniformity: self.uniformity,
        })
    }
}

impl RecordRepository for SqliteRecordRepository {
    #[instrument(skip(self))]
    fn load_production(&self) -> RepositoryResult<Vec<ProductionRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, record_date, aviary, batch_id,
                clean_eggs, dirty_eggs, cracked_eggs, floor_eggs,
                birds, egg_weight, bird_weight, mortality, note
            FROM production_record
            ORDER BY record_date, aviary, id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ProductionRow {
                id: row.get(0)?,
                record_date: row.get(1)?,
                aviary: row.get(2)?,
                batch_id: row.get(3)?,
                clean_eggs: row.get(4)?,
                dirty_eggs: row.get(5)?,
                cracked_eggs: row.get(6)?,
                floor_eggs: row.get(7)?,
                birds: row.get(8)?,
                egg_weight: row.get(9)?,
                bird_weight: row.get(10)?,
                mortality: row.get(11)?,
                note: row.get(12)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_domain()?);
        }
        debug!(count = records.len(), "日产记录加载完成");
        Ok(records)
    }

    #[instrument(skip(self, records), fields(count = records.len()))]
    fn save_production(&self, records: &[ProductionRecord]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM production_record", [])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO production_record (
                    id, record_date, aviary, batch_id,
                    clean_eggs, dirty_eggs, cracked_eggs, floor_eggs,
                    birds, egg_weight, bird_weight, mortality, note
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
            )?;

            for record in records {
                stmt.execute(params![
                    record.id,
                    record.date.format(ISO_DATE_FORMAT).to_string(),
                    record.aviary.to_string(),
                    record.batch_id,
                    record.clean_eggs,
                    record.dirty_eggs,
                    record.cracked_eggs,
                    record.floor_eggs,
                    record.birds,
                    record.egg_weight,
                    record.bird_weight,
                    record.mortality,
                    record.note,
                ])?;
            }
        }

        Self::commit(tx)?;
        debug!(count = records.len(), "日产记录已整体替换");
        Ok(records.len())
    }

    #[instrument(skip(self))]
    fn load_characterizations(&self) -> RepositoryResult<Vec<CharacterizationSnapshot>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, snapshot_date, aviary, batch_id,
                age_weeks, weight, uniformity, feathering
            FROM characterization_snapshot
            ORDER BY snapshot_date, aviary, batch_id, id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(SnapshotRow {
                id: row.get(0)?,
                snapshot_date: row.get(1)?,
                aviary: row.get(2)?,
                batch_id: row.get(3)?,
                age_weeks: row.get(4)?,
                weight: row.get(5)?,
                uniformity: row.get(6)?,
                feathering: row.get(7)?,
            })
        })?;

        let mut snapshots = Vec::new();
        for row in rows {
            snapshots.push(row?.into_domain()?);
        }
        debug!(count = snapshots.len(), "特征快照加载完成");
        Ok(snapshots)
    }

    #[instrument(skip(self, snapshots), fields(count = snapshots.len()))]
    fn save_characterizations(
        &self,
        snapshots: &[CharacterizationSnapshot],
    ) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute("DELETE FROM characterization_snapshot", [])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO characterization_snapshot (
                    id, snapshot_date, aviary, batch_id,
                    age_weeks, weight, uniformity, feathering
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )?;

            for snapshot in snapshots {
                stmt.execute(params![
                    snapshot.id,
                    snapshot.date.format(ISO_DATE_FORMAT).to_string(),
                    snapshot.aviary.to_string(),
                    snapshot.batch_id,
                    snapshot.age_weeks,
                    snapshot.weight,
                    snapshot.uniformity,
                    snapshot.feathering.code(),
                ])?;
            }
        }

        Self::commit(tx)?;
        debug!(count = snapshots.len(), "特征快照已整体替换");
        Ok(snapshots.len())
    }
}
