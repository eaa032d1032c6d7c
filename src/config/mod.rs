// ==========================================
// 蛋鸡生产记录核心 - 配置层
// ==========================================
// 职责: 导入参数配置（默认鸡舍 / 默认评级 / 散养鸡舍 / 行过滤阈值）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager, GLOBAL_SCOPE};
pub use import_config_trait::ImportConfigReader;
