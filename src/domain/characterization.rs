// ==========================================
// 蛋鸡生产记录核心 - 鸡群特征快照模型
// ==========================================
// 用途: 某一时点的鸡群评估（周龄 / 体重 / 均匀度 / 羽毛）
// 同一 (鸡舍, 批次) 在生命周期内可有多条快照，周龄递增
// ==========================================

use crate::domain::types::{Aviary, FeatheringQuality};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// CharacterizationSnapshot - 鸡群特征快照
// ==========================================
// 对齐: characterization_snapshot 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterizationSnapshot {
    pub id: String,
    pub date: NaiveDate,
    pub aviary: Aviary,
    pub batch_id: String,               // 必填批次号
    pub age_weeks: f64,                 // 周龄（> 0）
    pub weight: f64,                    // 鸡群平均体重（kg）
    pub uniformity: f64,                // 均匀度（0-100 %）
    pub feathering: FeatheringQuality,  // 羽毛评级
}

impl CharacterizationSnapshot {
    /// 自然键（日期 + 鸡舍 + 批次），用于导入合并
    pub fn natural_key(&self) -> (NaiveDate, Aviary, String) {
        (self.date, self.aviary, self.batch_id.clone())
    }
}
