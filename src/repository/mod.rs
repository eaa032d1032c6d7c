// ==========================================
// 蛋鸡生产记录核心 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 提供两类记录集合的整体读写，屏蔽数据库细节
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod record_repo;
pub mod record_repo_impl;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use record_repo::RecordRepository;
pub use record_repo_impl::SqliteRecordRepository;
