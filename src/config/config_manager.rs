// ==========================================
// 蛋鸡生产记录核心 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// 规则: 缺失取默认值；值非法时告警并取默认值，不中断导入
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::types::{Aviary, FeatheringQuality};
use rusqlite::{params, Connection};
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// 全局作用域
pub const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 读取并解析数值配置；非法值告警后取默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> Result<T, Box<dyn Error>>
    where
        T: FromStr + Copy + std::fmt::Display,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        match raw.trim().parse::<T>() {
            Ok(v) => Ok(v),
            Err(_) => {
                warn!(key, value = %raw, default = %default, "配置值非法，使用默认值");
                Ok(default)
            }
        }
    }
}

impl ImportConfigReader for ConfigManager {
    // ===== 解析默认值 =====

    fn get_default_aviary(&self) -> Result<Aviary, Box<dyn Error>> {
        let number = self.get_parsed_or_default(config_keys::DEFAULT_AVIARY, 1u8)?;
        match Aviary::from_number(number) {
            Some(aviary) => Ok(aviary),
            None => {
                warn!(value = number, "默认鸡舍编号超出范围，使用 1");
                Ok(Aviary::A1)
            }
        }
    }

    fn get_default_feathering(&self) -> Result<FeatheringQuality, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::DEFAULT_FEATHERING, "GOOD")?;
        match FeatheringQuality::from_code(&value) {
            Some(quality) => Ok(quality),
            None => {
                warn!(value = %value, "默认羽毛评级非法，使用 GOOD");
                Ok(FeatheringQuality::Good)
            }
        }
    }

    // ===== 鸡舍属性 =====

    fn get_cage_free_aviaries(&self) -> Result<Vec<Aviary>, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::CAGE_FREE_AVIARIES, "1,2")?;

        let aviaries: Vec<Aviary> = value
            .split(',')
            .filter_map(|s| s.trim().parse::<u8>().ok())
            .filter_map(Aviary::from_number)
            .collect();

        if aviaries.is_empty() && !value.trim().is_empty() {
            warn!(value = %value, "散养鸡舍配置非法，使用默认值 1,2");
            Ok(vec![Aviary::A1, Aviary::A2])
        } else {
            Ok(aviaries)
        }
    }

    // ===== 行过滤阈值 =====

    fn get_min_row_tokens(&self) -> Result<usize, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::MIN_ROW_TOKENS, 3usize)
    }

    fn get_min_identifier_len(&self) -> Result<usize, Box<dyn Error>> {
        self.get_parsed_or_default(config_keys::MIN_IDENTIFIER_LEN, 5usize)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 解析默认值
    pub const DEFAULT_AVIARY: &str = "default_aviary";
    pub const DEFAULT_FEATHERING: &str = "default_feathering";

    // 鸡舍属性（逗号分隔的鸡舍编号，空串表示全部笼养）
    pub const CAGE_FREE_AVIARIES: &str = "cage_free_aviaries";

    // 行过滤阈值
    pub const MIN_ROW_TOKENS: &str = "min_row_tokens";
    pub const MIN_IDENTIFIER_LEN: &str = "min_identifier_len";
}
