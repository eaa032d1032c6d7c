// ==========================================
// 蛋鸡生产记录核心 - 导入层
// ==========================================
// 职责: 外部分隔文本 → 领域记录 → 合并 → 存储
// 支持: CSV / TXT（';' 或 ',' 分隔，自动探测）
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod record_importer_impl;
pub mod record_importer_trait;
pub mod tabular_parser;
pub mod tokenizer;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{CharacterizationField, ColumnMap, HeaderMatch, ProductionField};
pub use record_importer_impl::RecordImporterImpl;
pub use record_importer_trait::RecordImporter;
pub use tabular_parser::{
    parse_characterizations, parse_production, ParseOutcome, ParserOptions, TabularParser,
};
pub use tokenizer::{tokenize, TabularText};
