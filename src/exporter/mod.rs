// ==========================================
// 蛋鸡生产记录核心 - 导出层
// ==========================================
// 职责: 记录集合 → ';' 分隔文本（可被导入层原样读回）
// ==========================================

pub mod csv_exporter;
pub mod error;

// 重导出
pub use csv_exporter::{
    escape_field, export_characterizations, export_production, write_export_file,
    CHARACTERIZATION_HEADERS, PRODUCTION_HEADERS,
};
pub use error::{ExportError, ExportResult};
