// ==========================================
// 蛋鸡生产记录核心 - 记录派生引擎
// ==========================================
// 职责: 原始日产记录 → ComputedRecord（总数 / 百分比 / 产蛋率 / 批次 / 周期）
// 红线: 纯函数、幂等、不修改任何输入集合
// ==========================================

use crate::domain::characterization::CharacterizationSnapshot;
use crate::domain::production::{ComputedRecord, ProductionRecord};
use crate::engine::batch_resolver::{select_snapshot, BatchResolver};
use crate::engine::temporal::{fortnight_of, month_label};
use chrono::Datelike;

/// 比例；分母为 0 时为 None（"未定义"与 0% 语义不同）
pub fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

/// 总蛋数（地面蛋缺失按 0）
///
/// 在 u64 中求和，单项取到 u32::MAX 也不会溢出
pub fn total_eggs(record: &ProductionRecord) -> u64 {
    [
        record.clean_eggs,
        record.dirty_eggs,
        record.cracked_eggs,
        record.floor_eggs.unwrap_or(0),
    ]
    .iter()
    .map(|&count| u64::from(count))
    .sum()
}

/// 派生单条记录（线性扫描快照）
pub fn derive_record(
    record: &ProductionRecord,
    snapshots: &[CharacterizationSnapshot],
) -> ComputedRecord {
    let resolved_batch_id = select_snapshot(snapshots.iter(), record.aviary, record.date)
        .map(|s| s.batch_id.clone());
    build_computed(record, resolved_batch_id)
}

/// 派生整个集合（快照只建一次索引），输出顺序与输入一致
pub fn derive_records(
    records: &[ProductionRecord],
    snapshots: &[CharacterizationSnapshot],
) -> Vec<ComputedRecord> {
    let resolver = BatchResolver::new(snapshots);
    records
        .iter()
        .map(|record| build_computed(record, resolver.resolve_batch(record.aviary, record.date)))
        .collect()
}

fn build_computed(record: &ProductionRecord, resolved_batch_id: Option<String>) -> ComputedRecord {
    let total = total_eggs(record);

    ComputedRecord {
        record: record.clone(),
        total_eggs: total,
        clean_pct: ratio(record.clean_eggs.into(), total),
        dirty_pct: ratio(record.dirty_eggs.into(), total),
        cracked_pct: ratio(record.cracked_eggs.into(), total),
        floor_pct: ratio(record.floor_eggs.unwrap_or(0).into(), total),
        laying_rate: ratio(total, record.birds.into()),
        resolved_batch_id,
        fortnight: fortnight_of(record.date),
        month: month_label(record.date),
        year: record.date.year(),
    }
}
