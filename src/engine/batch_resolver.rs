// ==========================================
// 蛋鸡生产记录核心 - 批次时间关联解析器
// ==========================================
// 职责: 按 (鸡舍, 日期) 在特征快照中做时间关联，解析记录所属批次
// 规则: 同鸡舍、快照日期 <= 记录日期 中取日期最大的一条
// 并列: 日期相同时取批次号字典序最大者，再取快照 ID 最大者
// ==========================================

use crate::domain::characterization::CharacterizationSnapshot;
use crate::domain::types::Aviary;
use crate::engine::temporal::weeks_between;
use chrono::NaiveDate;
use std::collections::HashMap;

/// 快照排序键（升序末位即胜出者）
fn snapshot_rank(snapshot: &CharacterizationSnapshot) -> (NaiveDate, &str, &str) {
    (snapshot.date, snapshot.batch_id.as_str(), snapshot.id.as_str())
}

/// 单次线性扫描选出生效快照
pub fn select_snapshot<'a, I>(
    snapshots: I,
    aviary: Aviary,
    date: NaiveDate,
) -> Option<&'a CharacterizationSnapshot>
where
    I: IntoIterator<Item = &'a CharacterizationSnapshot>,
{
    snapshots
        .into_iter()
        .filter(|s| s.aviary == aviary && s.date <= date)
        .max_by(|a, b| snapshot_rank(a).cmp(&snapshot_rank(b)))
}

/// 快照所示周龄推算到指定日期（纯日历日差 / 7）
pub fn week_age_at(snapshot: &CharacterizationSnapshot, date: NaiveDate) -> f64 {
    snapshot.age_weeks + weeks_between(snapshot.date, date)
}

// ==========================================
// BatchResolver - 批量解析用索引
// ==========================================
// 按鸡舍分组并排序一次，之后每条记录二分查找
pub struct BatchResolver<'a> {
    by_aviary: HashMap<Aviary, Vec<&'a CharacterizationSnapshot>>,
}

impl<'a> BatchResolver<'a> {
    pub fn new(snapshots: &'a [CharacterizationSnapshot]) -> Self {
        let mut by_aviary: HashMap<Aviary, Vec<&'a CharacterizationSnapshot>> = HashMap::new();
        for snapshot in snapshots {
            by_aviary.entry(snapshot.aviary).or_default().push(snapshot);
        }
        for list in by_aviary.values_mut() {
            list.sort_by(|a, b| snapshot_rank(a).cmp(&snapshot_rank(b)));
        }
        Self { by_aviary }
    }

    /// 解析生效快照
    pub fn resolve_snapshot(
        &self,
        aviary: Aviary,
        date: NaiveDate,
    ) -> Option<&'a CharacterizationSnapshot> {
        let list = self.by_aviary.get(&aviary)?;
        let idx = list.partition_point(|s| s.date <= date);
        idx.checked_sub(1).map(|i| list[i])
    }

    /// 解析生效批次号；无生效快照时为 None（不回退到记录自带批次）
    pub fn resolve_batch(&self, aviary: Aviary, date: NaiveDate) -> Option<String> {
        self.resolve_snapshot(aviary, date)
            .map(|s| s.batch_id.clone())
    }

    /// 指定日期的推算周龄
    pub fn week_age_on(&self, aviary: Aviary, date: NaiveDate) -> Option<f64> {
        self.resolve_snapshot(aviary, date)
            .map(|s| week_age_at(s, date))
    }
}
