// ==========================================
// 蛋鸡生产记录核心 - 记录集合 Repository Trait
// ==========================================
// 职责: 定义两类记录集合的整体读写接口（不包含业务逻辑）
// 红线: Repository 不含业务规则；合并 / 派生在引擎层完成
// ==========================================

use crate::domain::characterization::CharacterizationSnapshot;
use crate::domain::production::ProductionRecord;
use crate::repository::error::RepositoryResult;

// ==========================================
// RecordRepository Trait
// ==========================================
// 用途: 导入编排器与 CLI 的存储协作者
// 实现者: SqliteRecordRepository（使用 rusqlite）
pub trait RecordRepository: Send + Sync {
    /// 读取全部日产记录（按日期、鸡舍升序）
    fn load_production(&self) -> RepositoryResult<Vec<ProductionRecord>>;

    /// 整体替换日产记录集合
    ///
    /// # 返回
    /// - Ok(usize): 写入的记录数
    /// - Err: 数据库错误（整个事务回滚，原集合保持不变）
    fn save_production(&self, records: &[ProductionRecord]) -> RepositoryResult<usize>;

    /// 读取全部特征快照（按日期、鸡舍、批次升序）
    fn load_characterizations(&self) -> RepositoryResult<Vec<CharacterizationSnapshot>>;

    /// 整体替换特征快照集合
    fn save_characterizations(
        &self,
        snapshots: &[CharacterizationSnapshot],
    ) -> RepositoryResult<usize>;
}
