// ==========================================
// 蛋鸡生产记录核心 - 导入结果模型
// ==========================================
// 用途: 记录一次 CSV 导入的统计信息（返回调用方 + 日志）
// ==========================================

use crate::domain::types::RecordKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// ImportReport - 导入报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub import_id: String,           // 导入运行 ID（UUID）
    pub kind: RecordKind,            // 导入的集合类别
    pub file_name: Option<String>,   // 源文件名（文本导入时为空）
    pub total_rows: usize,           // 数据行数（不含表头）
    pub parsed_rows: usize,          // 成功解析行数
    pub skipped_rows: usize,         // 跳过行数（过短 / 页脚 / 非法日期）
    pub inserted: usize,             // 新增记录数
    pub updated: usize,              // 按自然键覆盖的记录数
    pub duplicate_keys: usize,       // 文件内重复自然键的行数（后写覆盖）
    pub warnings: Vec<String>,       // 非阻断警告
    pub collection_size: usize,      // 合并后集合大小
    pub imported_at: DateTime<Utc>,  // 导入完成时间
    pub elapsed_ms: u128,            // 耗时（毫秒）
}
