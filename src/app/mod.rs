// ==========================================
// 蛋鸡生产记录核心 - 应用层
// ==========================================
// 职责: 组装连接 / 仓储 / 配置 / 导入器，供 CLI 调用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
