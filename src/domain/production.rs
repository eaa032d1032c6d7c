// ==========================================
// 蛋鸡生产记录核心 - 日产蛋领域模型
// ==========================================
// 红线: 总蛋数 / 百分比 / 产蛋率均为派生字段，永不落库
// ==========================================

use crate::domain::types::Aviary;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductionRecord - 日产蛋原始记录
// ==========================================
// 用途: 表单/导入写入，派生引擎只读
// 对齐: production_record 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionRecord {
    // ===== 主键 =====
    pub id: String, // 不透明唯一标识

    // ===== 归属 =====
    pub date: NaiveDate,          // 记录日期（纯日历日）
    pub aviary: Aviary,           // 鸡舍
    pub batch_id: Option<String>, // 录入时的批次号（派生时可能被覆盖）

    // ===== 蛋数 =====
    pub clean_eggs: u32,         // 净蛋
    pub dirty_eggs: u32,         // 脏蛋
    pub cracked_eggs: u32,       // 破蛋
    pub floor_eggs: Option<u32>, // 地面蛋（仅散养鸡舍有意义）

    // ===== 鸡群 =====
    pub birds: u32,               // 存栏数
    pub egg_weight: Option<f64>,  // 平均蛋重（g）
    pub bird_weight: Option<f64>, // 平均体重（kg）
    pub mortality: u32,           // 死亡数

    // ===== 备注 =====
    pub note: Option<String>,
}

impl ProductionRecord {
    /// 创建一条空白记录（蛋数 / 存栏均为 0）
    pub fn new(id: impl Into<String>, date: NaiveDate, aviary: Aviary) -> Self {
        Self {
            id: id.into(),
            date,
            aviary,
            batch_id: None,
            clean_eggs: 0,
            dirty_eggs: 0,
            cracked_eggs: 0,
            floor_eggs: None,
            birds: 0,
            egg_weight: None,
            bird_weight: None,
            mortality: 0,
            note: None,
        }
    }

    /// 自然键（日期 + 鸡舍），用于导入合并
    pub fn natural_key(&self) -> (NaiveDate, Aviary) {
        (self.date, self.aviary)
    }
}

// ==========================================
// ComputedRecord - 派生记录
// ==========================================
// 用途: 报表/界面消费；每次集合变化后重新计算
// 百分比为 [0,1] 区间的比例；None 表示"未定义"，与 0 语义不同
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedRecord {
    #[serde(flatten)]
    pub record: ProductionRecord,

    // ===== 派生指标 =====
    pub total_eggs: u64, // 四项计数之和
    pub clean_pct: Option<f64>,
    pub dirty_pct: Option<f64>,
    pub cracked_pct: Option<f64>,
    pub floor_pct: Option<f64>,
    pub laying_rate: Option<f64>, // 总蛋数 / 存栏

    // ===== 时间关联 =====
    pub resolved_batch_id: Option<String>, // 按特征快照解析出的批次
    pub fortnight: String,                 // 半月周期标签
    pub month: String,                     // YYYY-MM
    pub year: i32,
}
