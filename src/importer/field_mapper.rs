// ==========================================
// 蛋鸡生产记录核心 - 表头字段映射器
// ==========================================
// 职责: 模糊表头 → 标准字段的列号映射
// 规则: 表头统一小写后按有序规则表匹配
//       每个表头只被第一条命中的规则认领；每个字段取第一个命中的表头
//       规则顺序即优先级（如 "Peso Ave" 先被体重认领，不会落到蛋重）
// ==========================================

use std::collections::HashMap;

// ==========================================
// 标准字段
// ==========================================

/// 日产记录字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductionField {
    Id,
    Date,
    Aviary,
    Batch,
    Clean,
    Dirty,
    Cracked,
    Floor,
    Birds,
    EggWeight,
    BirdWeight,
    Mortality,
    Note,
}

/// 特征快照字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterizationField {
    Id,
    Date,
    Aviary,
    Batch,
    AgeWeeks,
    Weight,
    Uniformity,
    Feathering,
}

// ==========================================
// HeaderMatch - 表头匹配谓词
// ==========================================
#[derive(Debug, Clone, Copy)]
pub enum HeaderMatch {
    /// 同时包含 all 中全部片段，且不含 none 中任一片段
    Contains {
        all: &'static [&'static str],
        none: &'static [&'static str],
    },
    /// 完全相等
    Exact(&'static str),
}

impl HeaderMatch {
    pub fn matches(&self, header: &str) -> bool {
        match self {
            HeaderMatch::Contains { all, none } => {
                all.iter().all(|p| header.contains(p)) && !none.iter().any(|p| header.contains(p))
            }
            HeaderMatch::Exact(expected) => header == *expected,
        }
    }
}

const fn contains(all: &'static [&'static str]) -> HeaderMatch {
    HeaderMatch::Contains { all, none: &[] }
}

const fn contains_without(
    all: &'static [&'static str],
    none: &'static [&'static str],
) -> HeaderMatch {
    HeaderMatch::Contains { all, none }
}

/// 日产记录规则表（顺序即优先级）
pub const PRODUCTION_RULES: &[(HeaderMatch, ProductionField)] = &[
    (contains(&["peso", "ave"]), ProductionField::BirdWeight),
    (contains(&["peso", "ovo"]), ProductionField::EggWeight),
    (contains_without(&["limpo"], &["%"]), ProductionField::Clean),
    (contains_without(&["sujo"], &["%"]), ProductionField::Dirty),
    (contains_without(&["trinc"], &["%"]), ProductionField::Cracked),
    (contains_without(&["chão"], &["%"]), ProductionField::Floor),
    (contains_without(&["chao"], &["%"]), ProductionField::Floor),
    (contains_without(&["cama"], &["%"]), ProductionField::Floor),
    (contains(&["mort"]), ProductionField::Mortality),
    (contains_without(&["aves"], &["peso", "%"]), ProductionField::Birds),
    (contains(&["data"]), ProductionField::Date),
    (contains(&["avi"]), ProductionField::Aviary),
    (contains(&["lote"]), ProductionField::Batch),
    (contains(&["obs"]), ProductionField::Note),
    (HeaderMatch::Exact("id"), ProductionField::Id),
];

/// 特征快照规则表（"uniformidade" 含 "idade"，均匀度必须先于周龄）
pub const CHARACTERIZATION_RULES: &[(HeaderMatch, CharacterizationField)] = &[
    (contains(&["uniform"]), CharacterizationField::Uniformity),
    (contains(&["idade"]), CharacterizationField::AgeWeeks),
    (contains(&["semana"]), CharacterizationField::AgeWeeks),
    (contains(&["peso"]), CharacterizationField::Weight),
    (contains(&["empen"]), CharacterizationField::Feathering),
    (contains(&["data"]), CharacterizationField::Date),
    (contains(&["avi"]), CharacterizationField::Aviary),
    (contains(&["lote"]), CharacterizationField::Batch),
    (HeaderMatch::Exact("id"), CharacterizationField::Id),
];

// ==========================================
// ColumnMap - 字段 → 列号
// ==========================================
#[derive(Debug, Clone)]
pub struct ColumnMap<F> {
    columns: HashMap<F, usize>,
}

impl<F: Copy + Eq + std::hash::Hash> ColumnMap<F> {
    /// 按规则表建立映射
    pub fn build(headers: &[String], rules: &[(HeaderMatch, F)]) -> Self {
        let mut columns = HashMap::new();

        for (idx, header) in headers.iter().enumerate() {
            let normalized = header.trim().to_lowercase();
            if let Some((_, field)) = rules.iter().find(|(rule, _)| rule.matches(&normalized)) {
                columns.entry(*field).or_insert(idx);
            }
        }

        Self { columns }
    }

    /// 字段所在列号
    pub fn column(&self, field: F) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    /// 取行内字段原值（缺列 / 行过短 → None）
    pub fn get<'r>(&self, row: &'r [String], field: F) -> Option<&'r str> {
        self.column(field)
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
    }

    /// 已映射字段数
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// 日产记录列映射
pub fn map_production_headers(headers: &[String]) -> ColumnMap<ProductionField> {
    ColumnMap::build(headers, PRODUCTION_RULES)
}

/// 特征快照列映射
pub fn map_characterization_headers(headers: &[String]) -> ColumnMap<CharacterizationField> {
    ColumnMap::build(headers, CHARACTERIZATION_RULES)
}
