// ==========================================
// 蛋鸡生产记录核心 - 报表筛选
// ==========================================
// 职责: 按时间窗口 / 半月 / 年份 / 鸡舍 / 批次筛选派生记录
// 优先级: 指定半月 > 指定年份 > 时间窗口
// 红线: 半月匹配一律走 compare_fortnights，禁止标签字符串直接比较
// ==========================================

use crate::domain::production::ComputedRecord;
use crate::domain::types::Aviary;
use crate::engine::temporal::compare_fortnights;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

// ==========================================
// TimeWindow - 时间窗口
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeWindow {
    Last7Days,
    Last30Days,
    CurrentMonth,
    CurrentYear,
    #[default]
    All,
}

impl TimeWindow {
    /// 判断日期是否落在窗口内（以 today 为基准，含两端）
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            TimeWindow::Last7Days => date >= today - Duration::days(7) && date <= today,
            TimeWindow::Last30Days => date >= today - Duration::days(30) && date <= today,
            TimeWindow::CurrentMonth => date.year() == today.year() && date.month() == today.month(),
            TimeWindow::CurrentYear => date.year() == today.year(),
            TimeWindow::All => true,
        }
    }
}

// ==========================================
// FilterSpec - 报表筛选条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub window: TimeWindow,
    pub fortnight: Option<String>, // 指定半月标签（覆盖年份与窗口）
    pub year: Option<i32>,         // 指定年份（覆盖窗口）
    pub aviary: Option<Aviary>,
    pub batch: Option<String>, // 按解析后的批次匹配
}

impl FilterSpec {
    /// 判断单条派生记录是否命中
    pub fn matches(&self, record: &ComputedRecord, today: NaiveDate) -> bool {
        let in_period = if let Some(fortnight) = &self.fortnight {
            compare_fortnights(&record.fortnight, fortnight) == Ordering::Equal
        } else if let Some(year) = self.year {
            record.year == year
        } else {
            self.window.contains(record.record.date, today)
        };
        if !in_period {
            return false;
        }

        if let Some(aviary) = self.aviary {
            if record.record.aviary != aviary {
                return false;
            }
        }

        match &self.batch {
            Some(batch) => record.resolved_batch_id.as_deref() == Some(batch.as_str()),
            None => true,
        }
    }
}

/// 应用筛选条件（保持输入顺序）
pub fn apply_filter<'a>(
    records: &'a [ComputedRecord],
    spec: &FilterSpec,
    today: NaiveDate,
) -> Vec<&'a ComputedRecord> {
    records.iter().filter(|r| spec.matches(r, today)).collect()
}

/// 数据中出现过的半月标签（去重，按时间倒序）
pub fn available_fortnights(records: &[ComputedRecord]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();
    for record in records {
        if !labels
            .iter()
            .any(|l| compare_fortnights(l, &record.fortnight) == Ordering::Equal)
        {
            labels.push(record.fortnight.clone());
        }
    }
    labels.sort_by(|a, b| compare_fortnights(b, a));
    labels
}

/// 数据中出现过的年份（去重，倒序）
pub fn available_years(records: &[ComputedRecord]) -> Vec<i32> {
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    years.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::characterization::CharacterizationSnapshot;
    use crate::domain::production::ProductionRecord;
    use crate::domain::types::FeatheringQuality;
    use crate::engine::record_derivation::derive_records;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn computed() -> Vec<ComputedRecord> {
        let rows = [
            (date(2023, 12, 20), Aviary::A1),
            (date(2024, 1, 5), Aviary::A1),
            (date(2024, 1, 20), Aviary::A2),
            (date(2024, 2, 10), Aviary::A1),
            (date(2024, 2, 12), Aviary::A2),
        ];
        let records: Vec<ProductionRecord> = rows
            .iter()
            .enumerate()
            .map(|(i, (d, a))| {
                let mut r = ProductionRecord::new(format!("rec-{:06}", i), *d, *a);
                r.clean_eggs = 10;
                r.birds = 20;
                r
            })
            .collect();
        let snapshots = vec![CharacterizationSnapshot {
            id: "snap-01".to_string(),
            date: date(2024, 1, 1),
            aviary: Aviary::A1,
            batch_id: "L1".to_string(),
            age_weeks: 22.0,
            weight: 1.5,
            uniformity: 88.0,
            feathering: FeatheringQuality::Good,
        }];
        derive_records(&records, &snapshots)
    }

    #[test]
    fn test_time_windows() {
        let today = date(2024, 2, 12);
        let records = computed();

        let last7 = FilterSpec {
            window: TimeWindow::Last7Days,
            ..Default::default()
        };
        assert_eq!(apply_filter(&records, &last7, today).len(), 2);

        let month = FilterSpec {
            window: TimeWindow::CurrentMonth,
            ..Default::default()
        };
        assert_eq!(apply_filter(&records, &month, today).len(), 2);

        let year = FilterSpec {
            window: TimeWindow::CurrentYear,
            ..Default::default()
        };
        assert_eq!(apply_filter(&records, &year, today).len(), 4);

        assert_eq!(apply_filter(&records, &FilterSpec::default(), today).len(), 5);
    }

    #[test]
    fn test_fortnight_overrides_year_and_window() {
        let spec = FilterSpec {
            window: TimeWindow::Last7Days,
            fortnight: Some("Jan/2024 - 2ª Quinzena".to_string()),
            year: Some(2023),
            ..Default::default()
        };
        let records = computed();
        let hits = apply_filter(&records, &spec, date(2030, 1, 1));

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].record.date, date(2024, 1, 20));
    }

    #[test]
    fn test_year_overrides_window() {
        let spec = FilterSpec {
            window: TimeWindow::Last7Days,
            year: Some(2023),
            ..Default::default()
        };
        let records = computed();
        assert_eq!(apply_filter(&records, &spec, date(2024, 2, 12)).len(), 1);
    }

    #[test]
    fn test_aviary_and_batch_filters() {
        let records = computed();
        let today = date(2024, 2, 12);

        let a2 = FilterSpec {
            aviary: Some(Aviary::A2),
            ..Default::default()
        };
        assert_eq!(apply_filter(&records, &a2, today).len(), 2);

        // 批次按解析结果匹配；2023-12-20 早于快照，不属于 L1
        let l1 = FilterSpec {
            batch: Some("L1".to_string()),
            ..Default::default()
        };
        assert_eq!(apply_filter(&records, &l1, today).len(), 2);
    }

    #[test]
    fn test_available_periods_descending() {
        let records = computed();

        assert_eq!(
            available_fortnights(&records),
            vec![
                "Fev/2024 - 1ª Quinzena",
                "Jan/2024 - 2ª Quinzena",
                "Jan/2024 - 1ª Quinzena",
                "Dez/2023 - 2ª Quinzena",
            ]
        );
        assert_eq!(available_years(&records), vec![2024, 2023]);
    }
}
