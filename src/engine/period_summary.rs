// ==========================================
// 蛋鸡生产记录核心 - 半月周期汇总
// ==========================================
// 职责: 按半月聚合派生记录（合计 + 均值），时间升序输出
// 红线: 均值只统计已定义的值；None 不按 0 计入
// ==========================================

use crate::domain::production::ComputedRecord;
use crate::engine::temporal::FortnightKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// PeriodSummary - 单个半月的汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub fortnight: String,
    pub record_count: usize,

    // ===== 合计 =====
    pub total_eggs: u64,
    pub clean_eggs: u64,
    pub mortality: u64,

    // ===== 均值（无定义值时为 None）=====
    pub avg_clean_pct: Option<f64>,
    pub avg_dirty_pct: Option<f64>,
    pub avg_cracked_pct: Option<f64>,
    pub avg_floor_pct: Option<f64>,
    pub avg_laying_rate: Option<f64>,
    pub avg_egg_weight: Option<f64>,
}

/// 只对 Some 值求均值
pub fn mean_defined<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// 按半月汇总
pub fn summarize_by_fortnight(records: &[ComputedRecord]) -> Vec<PeriodSummary> {
    let mut groups: BTreeMap<FortnightKey, Vec<&ComputedRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(FortnightKey::of(record.record.date))
            .or_default()
            .push(record);
    }

    groups
        .into_iter()
        .map(|(key, group)| summarize_group(key, &group))
        .collect()
}

fn summarize_group(key: FortnightKey, group: &[&ComputedRecord]) -> PeriodSummary {
    PeriodSummary {
        fortnight: key.to_string(),
        record_count: group.len(),
        total_eggs: group.iter().map(|r| r.total_eggs).sum(),
        clean_eggs: group.iter().map(|r| r.record.clean_eggs as u64).sum(),
        mortality: group.iter().map(|r| r.record.mortality as u64).sum(),
        avg_clean_pct: mean_defined(group.iter().map(|r| r.clean_pct)),
        avg_dirty_pct: mean_defined(group.iter().map(|r| r.dirty_pct)),
        avg_cracked_pct: mean_defined(group.iter().map(|r| r.cracked_pct)),
        avg_floor_pct: mean_defined(group.iter().map(|r| r.floor_pct)),
        avg_laying_rate: mean_defined(group.iter().map(|r| r.laying_rate)),
        avg_egg_weight: mean_defined(group.iter().map(|r| r.record.egg_weight)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::production::ProductionRecord;
    use crate::domain::types::Aviary;
    use crate::engine::record_derivation::derive_records;
    use chrono::NaiveDate;

    fn record(id: &str, d: NaiveDate, clean: u32, dirty: u32, birds: u32) -> ProductionRecord {
        let mut r = ProductionRecord::new(id, d, Aviary::A1);
        r.clean_eggs = clean;
        r.dirty_eggs = dirty;
        r.birds = birds;
        r.mortality = 1;
        r
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_mean_defined_skips_none() {
        assert_eq!(mean_defined([Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(mean_defined([None, None]), None);
        assert_eq!(mean_defined(Vec::<Option<f64>>::new()), None);
    }

    #[test]
    fn test_summary_chronological_across_years() {
        let records = derive_records(
            &[
                record("r-000001", date(2024, 1, 3), 90, 10, 100),
                record("r-000002", date(2023, 12, 28), 50, 50, 100),
                record("r-000003", date(2024, 1, 10), 0, 0, 0),
            ],
            &[],
        );

        let summary = summarize_by_fortnight(&records);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].fortnight, "Dez/2023 - 2ª Quinzena");
        assert_eq!(summary[1].fortnight, "Jan/2024 - 1ª Quinzena");

        let jan = &summary[1];
        assert_eq!(jan.record_count, 2);
        assert_eq!(jan.total_eggs, 100);
        assert_eq!(jan.mortality, 2);
        // 第三条总数为 0，百分比未定义，不拉低均值
        assert_eq!(jan.avg_clean_pct, Some(0.9));
        // 存栏为 0 的记录产蛋率未定义
        assert_eq!(jan.avg_laying_rate, Some(1.0));
        assert_eq!(jan.avg_egg_weight, None);
    }
}
