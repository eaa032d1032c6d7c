// ==========================================
// 蛋鸡生产记录核心 - 导入合并引擎
// ==========================================
// 职责: 按自然键把外部记录 upsert 到现有集合
// 规则: 自然键命中 → 覆盖内容、保留原 ID；未命中 → 新增
//       同键后写覆盖；重复导入时 ID 稳定
//       新增记录的 ID 已被其它自然键占用 → 换发新 UUID（集合内 ID 唯一）
// 自然键: 日产记录 (日期, 鸡舍)；特征快照 (日期, 鸡舍, 批次)
// ==========================================

use crate::domain::characterization::CharacterizationSnapshot;
use crate::domain::production::ProductionRecord;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;
use uuid::Uuid;

// ==========================================
// Identified - 带不透明 ID 的记录
// ==========================================
pub trait Identified {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

impl Identified for ProductionRecord {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Identified for CharacterizationSnapshot {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// 合并结果
#[derive(Debug, Clone)]
pub struct MergeOutcome<T> {
    pub records: Vec<T>, // 合并后集合（按自然键升序）
    pub inserted: usize,
    pub updated: usize,
    pub reassigned: Vec<(String, String)>, // (原 ID, 新 ID)：ID 冲突而换发
}

/// 合并导入
///
/// # 参数
/// - existing: 现有集合（只读）
/// - incoming: 外部解析出的记录
/// - key_of: 自然键提取函数（不得使用 ID）
pub fn merge_import<T, K, F>(existing: &[T], incoming: Vec<T>, key_of: F) -> MergeOutcome<T>
where
    T: Identified + Clone,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut by_key: BTreeMap<K, T> = BTreeMap::new();
    let mut taken_ids: HashSet<String> = HashSet::new();
    for record in existing {
        taken_ids.insert(record.id().to_string());
        by_key.insert(key_of(record), record.clone());
    }

    let mut inserted = 0;
    let mut updated = 0;
    let mut reassigned = Vec::new();
    for mut record in incoming {
        match by_key.entry(key_of(&record)) {
            Entry::Occupied(mut slot) => {
                record.set_id(slot.get().id().to_string());
                slot.insert(record);
                updated += 1;
            }
            Entry::Vacant(slot) => {
                if !taken_ids.insert(record.id().to_string()) {
                    let fresh = Uuid::new_v4().to_string();
                    reassigned.push((record.id().to_string(), fresh.clone()));
                    taken_ids.insert(fresh.clone());
                    record.set_id(fresh);
                }
                slot.insert(record);
                inserted += 1;
            }
        }
    }

    MergeOutcome {
        records: by_key.into_values().collect(),
        inserted,
        updated,
        reassigned,
    }
}

/// 日产记录合并（键: 日期 + 鸡舍）
pub fn merge_production(
    existing: &[ProductionRecord],
    incoming: Vec<ProductionRecord>,
) -> MergeOutcome<ProductionRecord> {
    merge_import(existing, incoming, ProductionRecord::natural_key)
}

/// 特征快照合并（键: 日期 + 鸡舍 + 批次）
pub fn merge_characterizations(
    existing: &[CharacterizationSnapshot],
    incoming: Vec<CharacterizationSnapshot>,
) -> MergeOutcome<CharacterizationSnapshot> {
    merge_import(existing, incoming, CharacterizationSnapshot::natural_key)
}

/// 检测待导入记录内的自然键重复
///
/// # 返回
/// - Vec<(序号, ID)>: 与更早一行同键的记录（不含首次出现）
pub fn detect_duplicate_keys<T, K, F>(records: &[T], key_of: F) -> Vec<(usize, String)>
where
    T: Identified,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut first_occurrence: HashMap<K, usize> = HashMap::new();
    let mut duplicates = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        let key = key_of(record);
        if first_occurrence.contains_key(&key) {
            duplicates.push((idx, record.id().to_string()));
        } else {
            first_occurrence.insert(key, idx);
        }
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{Aviary, FeatheringQuality};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn production(id: &str, d: NaiveDate, aviary: Aviary, clean: u32) -> ProductionRecord {
        let mut r = ProductionRecord::new(id, d, aviary);
        r.clean_eggs = clean;
        r.birds = 100;
        r
    }

    #[test]
    fn test_merge_preserves_existing_identifier() {
        let existing = vec![production("orig-0001", date(2024, 3, 1), Aviary::A1, 50)];
        let incoming = vec![production("novo-9999", date(2024, 3, 1), Aviary::A1, 70)];

        let outcome = merge_production(&existing, incoming);

        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.inserted, 0);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].id, "orig-0001");
        assert_eq!(outcome.records[0].clean_eggs, 70);
        // 输入不被修改
        assert_eq!(existing[0].clean_eggs, 50);
    }

    #[test]
    fn test_merge_inserts_new_keys_without_disturbing() {
        let existing = vec![
            production("orig-0001", date(2024, 3, 1), Aviary::A1, 50),
            production("orig-0002", date(2024, 3, 1), Aviary::A2, 60),
        ];
        let incoming = vec![production("novo-0003", date(2024, 3, 2), Aviary::A1, 55)];

        let outcome = merge_production(&existing, incoming);

        assert_eq!(outcome.inserted, 1);
        assert_eq!(outcome.updated, 0);
        assert_eq!(outcome.records.len(), 3);
        assert!(outcome.records.contains(&existing[0]));
        assert!(outcome.records.contains(&existing[1]));
        assert!(outcome.records.iter().any(|r| r.id == "novo-0003"));
    }

    #[test]
    fn test_merge_last_write_wins_within_incoming() {
        let incoming = vec![
            production("a-000001", date(2024, 4, 1), Aviary::A3, 1),
            production("b-000002", date(2024, 4, 1), Aviary::A3, 2),
        ];

        let outcome = merge_production(&[], incoming);

        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].clean_eggs, 2);
        // 首个写入者的 ID 保持稳定
        assert_eq!(outcome.records[0].id, "a-000001");
        assert_eq!(outcome.inserted, 1);
        assert_eq!(outcome.updated, 1);
    }

    #[test]
    fn test_merge_reimport_is_stable() {
        let incoming = vec![production("x-000001", date(2024, 4, 1), Aviary::A1, 9)];
        let first = merge_production(&[], incoming.clone());

        let mut again = incoming;
        again[0].id = "y-000002".to_string();
        let second = merge_production(&first.records, again);

        assert_eq!(second.records, first.records);
    }

    #[test]
    fn test_reused_id_on_new_key_gets_fresh_id() {
        let existing = vec![production("rec-000001", date(2024, 3, 1), Aviary::A1, 50)];
        // 同一 ID，日期改了 → 新自然键
        let incoming = vec![production("rec-000001", date(2024, 3, 2), Aviary::A1, 60)];

        let outcome = merge_production(&existing, incoming);

        assert_eq!(outcome.inserted, 1);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.reassigned.len(), 1);
        assert_eq!(outcome.reassigned[0].0, "rec-000001");

        let original = outcome
            .records
            .iter()
            .find(|r| r.date == date(2024, 3, 1))
            .unwrap();
        let moved = outcome
            .records
            .iter()
            .find(|r| r.date == date(2024, 3, 2))
            .unwrap();
        assert_eq!(original.id, "rec-000001");
        assert_eq!(moved.id, outcome.reassigned[0].1);
        assert_ne!(moved.id, original.id);
    }

    #[test]
    fn test_same_id_twice_within_incoming_stays_unique() {
        let incoming = vec![
            production("dup-000001", date(2024, 5, 1), Aviary::A1, 1),
            production("dup-000001", date(2024, 5, 2), Aviary::A1, 2),
            production("dup-000001", date(2024, 5, 3), Aviary::A1, 3),
        ];

        let outcome = merge_production(&[], incoming);

        let ids: HashSet<&str> = outcome.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains("dup-000001"));
        assert_eq!(outcome.reassigned.len(), 2);
    }

    #[test]
    fn test_update_does_not_count_as_reassignment() {
        let existing = vec![production("rec-000001", date(2024, 3, 1), Aviary::A1, 50)];
        let incoming = vec![production("rec-000001", date(2024, 3, 1), Aviary::A1, 70)];

        let outcome = merge_production(&existing, incoming);

        assert_eq!(outcome.updated, 1);
        assert!(outcome.reassigned.is_empty());
        assert_eq!(outcome.records[0].id, "rec-000001");
    }

    #[test]
    fn test_characterization_key_includes_batch() {
        let snap = |id: &str, batch: &str| CharacterizationSnapshot {
            id: id.to_string(),
            date: date(2024, 1, 10),
            aviary: Aviary::A2,
            batch_id: batch.to_string(),
            age_weeks: 25.0,
            weight: 1.5,
            uniformity: 90.0,
            feathering: FeatheringQuality::Good,
        };

        let existing = vec![snap("c-000001", "L1")];
        let outcome = merge_characterizations(&existing, vec![snap("c-000002", "L2"), snap("c-000003", "L1")]);

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.inserted, 1);
        assert_eq!(outcome.updated, 1);
        let l1 = outcome.records.iter().find(|s| s.batch_id == "L1").unwrap();
        assert_eq!(l1.id, "c-000001");
    }

    #[test]
    fn test_detect_duplicate_keys() {
        let records = vec![
            production("r-000001", date(2024, 3, 1), Aviary::A1, 1),
            production("r-000002", date(2024, 3, 1), Aviary::A2, 1),
            production("r-000003", date(2024, 3, 1), Aviary::A1, 1),
        ];

        let duplicates = detect_duplicate_keys(&records, ProductionRecord::natural_key);

        assert_eq!(duplicates, vec![(2, "r-000003".to_string())]);
    }
}
