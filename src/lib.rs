// ==========================================
// 蛋鸡生产记录核心 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 核心: 派生指标 / 批次时间关联 / 半月周期 / CSV 导入合并与导出
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 纯函数规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 分隔文本
pub mod exporter;

// 配置层 - 导入参数
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型与实体
pub use domain::{
    Aviary, CharacterizationSnapshot, ComputedRecord, FeatheringQuality, ImportReport,
    ProductionRecord, RecordKind,
};

// 引擎
pub use engine::{
    compare_fortnights, derive_record, derive_records, fortnight_of, merge_import, FilterSpec,
    TimeWindow,
};

// 导入 / 导出
pub use exporter::{export_characterizations, export_production};
pub use importer::{RecordImporter, RecordImporterImpl, TabularParser};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Aviary Records";
