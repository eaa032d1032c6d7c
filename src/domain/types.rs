// ==========================================
// 蛋鸡生产记录核心 - 领域类型定义
// ==========================================
// 红线: 鸡舍 / 羽毛评级均为封闭枚举，禁止开放字符串
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 鸡舍 (Aviary)
// ==========================================
// 固定 4 个鸡舍；部分为散养（地面蛋计入缺陷），部分为笼养
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Aviary {
    A1,
    A2,
    A3,
    A4,
}

impl Aviary {
    /// 全部鸡舍（按编号升序）
    pub const ALL: [Aviary; 4] = [Aviary::A1, Aviary::A2, Aviary::A3, Aviary::A4];

    /// 鸡舍编号（1-4）
    pub fn number(self) -> u8 {
        match self {
            Aviary::A1 => 1,
            Aviary::A2 => 2,
            Aviary::A3 => 3,
            Aviary::A4 => 4,
        }
    }

    /// 按编号查找鸡舍
    pub fn from_number(number: u8) -> Option<Aviary> {
        Aviary::ALL.into_iter().find(|a| a.number() == number)
    }

    /// 按存储编码解析（"A1".."A4"）
    pub fn from_code(code: &str) -> Option<Aviary> {
        match code.trim().to_uppercase().as_str() {
            "A1" => Some(Aviary::A1),
            "A2" => Some(Aviary::A2),
            "A3" => Some(Aviary::A3),
            "A4" => Some(Aviary::A4),
            _ => None,
        }
    }

    /// 展示名（源语言）
    pub fn label(self) -> String {
        format!("Aviário {}", self.number())
    }
}

impl fmt::Display for Aviary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aviary::A1 => write!(f, "A1"),
            Aviary::A2 => write!(f, "A2"),
            Aviary::A3 => write!(f, "A3"),
            Aviary::A4 => write!(f, "A4"),
        }
    }
}

// ==========================================
// 羽毛评级 (Feathering Quality)
// ==========================================
// 有序: VeryGood > Good > Regular > Poor > VeryPoor
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatheringQuality {
    VeryGood, // 很好
    Good,     // 好
    Regular,  // 一般
    Poor,     // 差
    VeryPoor, // 很差
}

impl FeatheringQuality {
    /// 等级分值（越大越好）
    pub fn rank(self) -> u8 {
        match self {
            FeatheringQuality::VeryGood => 5,
            FeatheringQuality::Good => 4,
            FeatheringQuality::Regular => 3,
            FeatheringQuality::Poor => 2,
            FeatheringQuality::VeryPoor => 1,
        }
    }

    /// 展示名（源语言，导出使用）
    pub fn label(self) -> &'static str {
        match self {
            FeatheringQuality::VeryGood => "Muito Boa",
            FeatheringQuality::Good => "Boa",
            FeatheringQuality::Regular => "Regular",
            FeatheringQuality::Poor => "Ruim",
            FeatheringQuality::VeryPoor => "Péssima",
        }
    }

    /// 数据库编码
    pub fn code(self) -> &'static str {
        match self {
            FeatheringQuality::VeryGood => "VERY_GOOD",
            FeatheringQuality::Good => "GOOD",
            FeatheringQuality::Regular => "REGULAR",
            FeatheringQuality::Poor => "POOR",
            FeatheringQuality::VeryPoor => "VERY_POOR",
        }
    }

    /// 按数据库编码解析
    pub fn from_code(code: &str) -> Option<FeatheringQuality> {
        match code.trim().to_uppercase().as_str() {
            "VERY_GOOD" => Some(FeatheringQuality::VeryGood),
            "GOOD" => Some(FeatheringQuality::Good),
            "REGULAR" => Some(FeatheringQuality::Regular),
            "POOR" => Some(FeatheringQuality::Poor),
            "VERY_POOR" => Some(FeatheringQuality::VeryPoor),
            _ => None,
        }
    }
}

impl PartialOrd for FeatheringQuality {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FeatheringQuality {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for FeatheringQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 记录类别 (Record Kind)
// ==========================================
// 导入/导出时区分两类集合
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordKind {
    Production,       // 日产蛋记录
    Characterization, // 鸡群特征快照
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Production => write!(f, "PRODUCTION"),
            RecordKind::Characterization => write!(f, "CHARACTERIZATION"),
        }
    }
}
