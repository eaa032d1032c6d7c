// ==========================================
// 蛋鸡生产记录核心 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod characterization;
pub mod import;
pub mod production;
pub mod types;

// 重导出核心类型
pub use characterization::CharacterizationSnapshot;
pub use import::ImportReport;
pub use production::{ComputedRecord, ProductionRecord};
pub use types::{Aviary, FeatheringQuality, RecordKind};
