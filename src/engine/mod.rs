// ==========================================
// 蛋鸡生产记录核心 - 引擎层
// ==========================================
// 职责: 时间工具 / 批次时间关联 / 记录派生 / 导入合并 / 报表辅助
// 红线: Engine 不拼 SQL、不做 I/O，输入集合只读
// ==========================================

pub mod batch_resolver;
pub mod import_merge;
pub mod period_summary;
pub mod record_derivation;
pub mod report_filter;
pub mod temporal;

// 重导出核心引擎
pub use batch_resolver::{select_snapshot, week_age_at, BatchResolver};
pub use import_merge::{
    detect_duplicate_keys, merge_characterizations, merge_import, merge_production, Identified,
    MergeOutcome,
};
pub use period_summary::{summarize_by_fortnight, PeriodSummary};
pub use record_derivation::{derive_record, derive_records};
pub use report_filter::{apply_filter, available_fortnights, available_years, FilterSpec, TimeWindow};
pub use temporal::{
    compare_fortnights, format_local_date, fortnight_of, parse_local_date, today, FortnightKey,
};
