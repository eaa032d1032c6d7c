// ==========================================
// 蛋鸡生产记录核心 - 表格解析器
// ==========================================
// 职责: 分隔文本 → ProductionRecord / CharacterizationSnapshot
// 流程: 分词 → 表头映射 → 逐行类型转换 → 丢弃无效行
// 红线: 不返回错误；坏行跳过并计数，坏字段取默认值
// ==========================================

use crate::domain::characterization::CharacterizationSnapshot;
use crate::domain::production::ProductionRecord;
use crate::domain::types::{Aviary, FeatheringQuality};
use crate::engine::temporal::today;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::field_mapper::{
    map_characterization_headers, map_production_headers, CharacterizationField as CF,
    ProductionField as PF,
};
use crate::importer::tokenizer::tokenize;
use chrono::NaiveDate;
use tracing::debug;

// ==========================================
// ParserOptions - 解析参数
// ==========================================
#[derive(Debug, Clone)]
pub struct ParserOptions {
    pub min_row_tokens: usize,                 // 少于该列数的行视为页脚 / 垃圾行
    pub min_identifier_len: usize,             // ID 长度需严格大于该值才沿用
    pub default_aviary: Aviary,                // 无法识别鸡舍时
    pub default_feathering: FeatheringQuality, // 无法识别羽毛评级时
    pub fallback_date: NaiveDate,              // 日期单元格为空时
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            min_row_tokens: 3,
            min_identifier_len: 5,
            default_aviary: Aviary::A1,
            default_feathering: FeatheringQuality::Good,
            fallback_date: today(),
        }
    }
}

/// 解析结果
#[derive(Debug, Clone)]
pub struct ParseOutcome<T> {
    pub records: Vec<T>,
    pub total_rows: usize,   // 数据行数（不含表头与空行）
    pub skipped_rows: usize, // 被丢弃的行数
}

impl<T> ParseOutcome<T> {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            total_rows: 0,
            skipped_rows: 0,
        }
    }
}

// ==========================================
// TabularParser
// ==========================================
pub struct TabularParser {
    options: ParserOptions,
    cleaner: DataCleaner,
}

impl TabularParser {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            options,
            cleaner: DataCleaner,
        }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// 解析日产记录
    ///
    /// # 规则
    /// - 列数不足 → 跳过
    /// - 日期单元格为空且净蛋与存栏均为 0 → 跳过（汇总 / 空白行）
    /// - 日期非法 → 跳过
    pub fn parse_production(&self, text: &str) -> ParseOutcome<ProductionRecord> {
        let table = tokenize(text);
        if table.headers.is_empty() {
            return ParseOutcome::empty();
        }

        let columns = map_production_headers(&table.headers);
        debug!(mapped_fields = columns.len(), "日产记录表头映射完成");

        let c = &self.cleaner;
        let mut records = Vec::with_capacity(table.rows.len());
        let mut skipped_rows = 0;

        for (idx, row) in table.rows.iter().enumerate() {
            let line_no = idx + 2;
            if row.len() < self.options.min_row_tokens {
                debug!(line_no, tokens = row.len(), "列数不足，跳过");
                skipped_rows += 1;
                continue;
            }

            let raw_date = c.normalize_text(columns.get(row, PF::Date));
            let clean_eggs = c.parse_count(columns.get(row, PF::Clean));
            let birds = c.parse_count(columns.get(row, PF::Birds));
            if raw_date.is_none() && clean_eggs == 0 && birds == 0 {
                debug!(line_no, "空白汇总行，跳过");
                skipped_rows += 1;
                continue;
            }

            let Some(date) = c.parse_date(raw_date.as_deref(), self.options.fallback_date) else {
                debug!(line_no, raw_date = ?raw_date, "日期非法，跳过");
                skipped_rows += 1;
                continue;
            };

            records.push(ProductionRecord {
                id: c.parse_identifier(columns.get(row, PF::Id), self.options.min_identifier_len),
                date,
                aviary: c.parse_aviary(columns.get(row, PF::Aviary), self.options.default_aviary),
                batch_id: c.normalize_text(columns.get(row, PF::Batch)),
                clean_eggs,
                dirty_eggs: c.parse_count(columns.get(row, PF::Dirty)),
                cracked_eggs: c.parse_count(columns.get(row, PF::Cracked)),
                floor_eggs: c.parse_optional_count(columns.get(row, PF::Floor)),
                birds,
                egg_weight: c.parse_number(columns.get(row, PF::EggWeight)),
                bird_weight: c.parse_number(columns.get(row, PF::BirdWeight)),
                mortality: c.parse_count(columns.get(row, PF::Mortality)),
                note: c.normalize_text(columns.get(row, PF::Note)),
            });
        }

        ParseOutcome {
            records,
            total_rows: table.rows.len(),
            skipped_rows,
        }
    }

    /// 解析特征快照
    ///
    /// # 规则
    /// - 列数不足 → 跳过
    /// - 日期单元格为空或周龄 <= 0 → 跳过
    /// - 日期非法 → 跳过
    pub fn parse_characterizations(&self, text: &str) -> ParseOutcome<CharacterizationSnapshot> {
        let table = tokenize(text);
        if table.headers.is_empty() {
            return ParseOutcome::empty();
        }

        let columns = map_characterization_headers(&table.headers);
        debug!(mapped_fields = columns.len(), "特征快照表头映射完成");

        let c = &self.cleaner;
        let mut records = Vec::with_capacity(table.rows.len());
        let mut skipped_rows = 0;

        for (idx, row) in table.rows.iter().enumerate() {
            let line_no = idx + 2;
            if row.len() < self.options.min_row_tokens {
                debug!(line_no, tokens = row.len(), "列数不足，跳过");
                skipped_rows += 1;
                continue;
            }

            let raw_date = c.normalize_text(columns.get(row, CF::Date));
            let age_weeks = c.parse_required_number(columns.get(row, CF::AgeWeeks));
            if raw_date.is_none() || age_weeks <= 0.0 {
                debug!(line_no, age_weeks, "缺少日期或周龄，跳过");
                skipped_rows += 1;
                continue;
            }

            let Some(date) = c.parse_date(raw_date.as_deref(), self.options.fallback_date) else {
                debug!(line_no, raw_date = ?raw_date, "日期非法，跳过");
                skipped_rows += 1;
                continue;
            };

            records.push(CharacterizationSnapshot {
                id: c.parse_identifier(columns.get(row, CF::Id), self.options.min_identifier_len),
                date,
                aviary: c.parse_aviary(columns.get(row, CF::Aviary), self.options.default_aviary),
                batch_id: c
                    .normalize_text(columns.get(row, CF::Batch))
                    .unwrap_or_default(),
                age_weeks,
                weight: c.parse_required_number(columns.get(row, CF::Weight)),
                uniformity: c.parse_required_number(columns.get(row, CF::Uniformity)),
                feathering: c.parse_feathering(
                    columns.get(row, CF::Feathering),
                    self.options.default_feathering,
                ),
            });
        }

        ParseOutcome {
            records,
            total_rows: table.rows.len(),
            skipped_rows,
        }
    }
}

impl Default for TabularParser {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

/// 以默认参数解析日产记录
pub fn parse_production(text: &str) -> ParseOutcome<ProductionRecord> {
    TabularParser::default().parse_production(text)
}

/// 以默认参数解析特征快照
pub fn parse_characterizations(text: &str) -> ParseOutcome<CharacterizationSnapshot> {
    TabularParser::default().parse_characterizations(text)
}
