// ==========================================
// 蛋鸡生产记录核心 - CSV 导出器
// ==========================================
// 格式: ';' 分隔 / 日/月/年日期 / 小数逗号 / '\n' 行尾
// 引号: 非空备注一律加引号；其它文本字段含 ';' '"' 或换行时加引号
//       引号内的 '"' 写成 '""'
// 约束: 导出后再导入，原始字段保持不变
// ==========================================

use crate::domain::characterization::CharacterizationSnapshot;
use crate::domain::production::ComputedRecord;
use crate::engine::temporal::format_display_date;
use crate::exporter::error::{ExportError, ExportResult};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::path::Path;
use tracing::info;

/// 日产记录导出表头
pub const PRODUCTION_HEADERS: [&str; 22] = [
    "ID",
    "Data",
    "Aviário",
    "Lote",
    "Limpos",
    "Sujos",
    "Trincados",
    "Chão",
    "Total Ovos",
    "% Limpos",
    "% Sujos",
    "% Trincados",
    "% Chão",
    "Aves",
    "Taxa Postura",
    "Peso Ovos (g)",
    "Peso Aves (kg)",
    "Mortalidade",
    "Lote Vinculado",
    "Quinzena",
    "Mês",
    "Observações",
];

/// 特征快照导出表头
pub const CHARACTERIZATION_HEADERS: [&str; 8] = [
    "ID",
    "Data",
    "Aviário",
    "Lote",
    "Idade (semanas)",
    "Peso (kg)",
    "Uniformidade (%)",
    "Empenamento",
];

const DELIMITER: u8 = b';';

// ==========================================
// 字段格式化
// ==========================================

/// 小数逗号
pub fn format_decimal(value: f64) -> String {
    value.to_string().replace('.', ",")
}

/// 可空小数（None → 空）
pub fn format_optional_decimal(value: Option<f64>) -> String {
    value.map(format_decimal).unwrap_or_default()
}

/// 比例 → 百分数（两位小数；None → 空）
pub fn format_percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v * 100.0).replace('.', ","))
        .unwrap_or_default()
}

/// 产蛋率（四位小数；None → 空）
pub fn format_rate(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.4}", v).replace('.', ","))
        .unwrap_or_default()
}

/// 文本字段转义
///
/// # 参数
/// - always_quote: 非空时无条件加引号（备注列）
pub fn escape_field(value: &str, always_quote: bool) -> String {
    let needs_quote = (always_quote && !value.is_empty())
        || value.contains(DELIMITER as char)
        || value.contains('"')
        || value.contains('\n')
        || value.contains('\r');

    if needs_quote {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// 已转义字段 → 文本（csv 只负责分隔符与行尾）
fn write_rows<I>(headers: &[&str], rows: I) -> ExportResult<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    let mut count = 0usize;
    for row in rows {
        writer.write_record(&row)?;
        count += 1;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::CsvWriteError(e.to_string()))?;
    info!(rows = count, "导出文本生成完成");
    String::from_utf8(bytes).map_err(|e| ExportError::Other(e.into()))
}

// ==========================================
// 导出
// ==========================================

/// 日产记录（原始字段 + 派生字段）
pub fn export_production(records: &[ComputedRecord]) -> ExportResult<String> {
    write_rows(
        &PRODUCTION_HEADERS,
        records.iter().map(|c| {
            let r = &c.record;
            vec![
                escape_field(&r.id, false),
                format_display_date(r.date),
                r.aviary.label(),
                escape_field(r.batch_id.as_deref().unwrap_or(""), false),
                r.clean_eggs.to_string(),
                r.dirty_eggs.to_string(),
                r.cracked_eggs.to_string(),
                r.floor_eggs.map(|v| v.to_string()).unwrap_or_default(),
                c.total_eggs.to_string(),
                format_percent(c.clean_pct),
                format_percent(c.dirty_pct),
                format_percent(c.cracked_pct),
                format_percent(c.floor_pct),
                r.birds.to_string(),
                format_rate(c.laying_rate),
                format_optional_decimal(r.egg_weight),
                format_optional_decimal(r.bird_weight),
                r.mortality.to_string(),
                escape_field(c.resolved_batch_id.as_deref().unwrap_or(""), false),
                c.fortnight.clone(),
                c.month.clone(),
                escape_field(r.note.as_deref().unwrap_or(""), true),
            ]
        }),
    )
}

/// 特征快照
pub fn export_characterizations(snapshots: &[CharacterizationSnapshot]) -> ExportResult<String> {
    write_rows(
        &CHARACTERIZATION_HEADERS,
        snapshots.iter().map(|s| {
            vec![
                escape_field(&s.id, false),
                format_display_date(s.date),
                s.aviary.label(),
                escape_field(&s.batch_id, false),
                format_decimal(s.age_weeks),
                format_decimal(s.weight),
                format_decimal(s.uniformity),
                s.feathering.label().to_string(),
            ]
        }),
    )
}

/// 写出到文件（UTF-8）
pub fn write_export_file(path: &Path, content: &str) -> ExportResult<()> {
    std::fs::write(path, content)?;
    info!(path = %path.display(), bytes = content.len(), "导出文件已写入");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::production::ProductionRecord;
    use crate::domain::types::{Aviary, FeatheringQuality};
    use crate::engine::record_derivation::derive_record;
    use chrono::NaiveDate;

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("simples", false), "simples");
        assert_eq!(escape_field("simples", true), "\"simples\"");
        assert_eq!(escape_field("", true), "");
        assert_eq!(escape_field("a;b", false), "\"a;b\"");
        assert_eq!(escape_field("diz \"oi\"", true), "\"diz \"\"oi\"\"\"");
    }

    #[test]
    fn test_number_formats() {
        assert_eq!(format_decimal(1.5), "1,5");
        assert_eq!(format_decimal(30.0), "30");
        assert_eq!(format_percent(Some(0.8)), "80,00");
        assert_eq!(format_percent(None), "");
        assert_eq!(format_rate(Some(0.5)), "0,5000");
    }

    #[test]
    fn test_export_production_row() {
        let mut r = ProductionRecord::new(
            "rec-000001",
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            Aviary::A2,
        );
        r.clean_eggs = 80;
        r.dirty_eggs = 10;
        r.cracked_eggs = 5;
        r.floor_eggs = Some(5);
        r.birds = 200;
        r.egg_weight = Some(62.5);
        r.note = Some("ok; seco".to_string());

        let text = export_production(&[derive_record(&r, &[])]).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], PRODUCTION_HEADERS.join(";"));
        assert_eq!(
            lines[1],
            "rec-000001;05/03/2024;Aviário 2;;80;10;5;5;100;80,00;10,00;5,00;5,00;200;0,5000;62,5;;0;;Mar/2024 - 1ª Quinzena;2024-03;\"ok; seco\""
        );
    }

    #[test]
    fn test_export_characterizations_row() {
        let s = CharacterizationSnapshot {
            id: "snap-000001".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            aviary: Aviary::A4,
            batch_id: "L-2024".to_string(),
            age_weeks: 30.5,
            weight: 1.62,
            uniformity: 87.0,
            feathering: FeatheringQuality::VeryGood,
        };

        let text = export_characterizations(&[s]).unwrap();
        assert_eq!(
            text,
            "ID;Data;Aviário;Lote;Idade (semanas);Peso (kg);Uniformidade (%);Empenamento\n\
             snap-000001;10/01/2024;Aviário 4;L-2024;30,5;1,62;87;Muito Boa\n"
        );
    }
}
