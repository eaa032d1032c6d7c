// ==========================================
// 蛋鸡生产记录核心 - 时间工具纯函数库
// ==========================================
// 职责: 日期格式互转 / 半月周期计算 / 半月标签全序比较
// 红线: 所有日内计算基于 NaiveDate（纯日历日，无时区），
//       避免非 UTC 时区在午夜附近发生日期偏移
// ==========================================

use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;
use std::fmt;

/// 月份缩写表（源语言，固定 12 项）
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// 半月标签中的分隔符
const FORTNIGHT_SEPARATOR: &str = " - ";

/// ISO 日期格式
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// 展示日期格式（日/月/年）
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

// ==========================================
// 当前日期
// ==========================================

/// 当前本地日历日（忽略时分秒）
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// 当前本地日历日（ISO 形式）
pub fn today_iso() -> String {
    today().format(ISO_DATE_FORMAT).to_string()
}

// ==========================================
// 日期格式互转
// ==========================================

/// ISO 字符串 → NaiveDate（非法返回 None）
pub fn to_naive_date(iso: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(iso.trim(), ISO_DATE_FORMAT).ok()
}

/// NaiveDate → 展示形式（DD/MM/YYYY）
pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// ISO（YYYY-MM-DD）→ 展示形式（DD/MM/YYYY）
///
/// 非 ISO 输入原样返回
pub fn format_local_date(iso: &str) -> String {
    match to_naive_date(iso) {
        Some(date) => format_display_date(date),
        None => iso.to_string(),
    }
}

/// 展示形式（D/M/YY 或 DD/MM/YYYY）→ ISO，空输入取当前日期
pub fn parse_local_date(value: &str) -> String {
    parse_local_date_with(value, today())
}

/// 展示形式 → ISO，空输入取 `fallback`
///
/// # 规则
/// - 空白 → fallback 的 ISO 形式
/// - 不含 `/` → 视为已是 ISO，原样返回
/// - 日 / 月单位数补零；两位年份前缀 `20`
pub fn parse_local_date_with(value: &str, fallback: NaiveDate) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return fallback.format(ISO_DATE_FORMAT).to_string();
    }
    if !trimmed.contains('/') {
        return trimmed.to_string();
    }

    let parts: Vec<&str> = trimmed.split('/').map(str::trim).collect();
    if parts.len() != 3 {
        return trimmed.to_string();
    }

    let day = pad_two(parts[0]);
    let month = pad_two(parts[1]);
    let year = if parts[2].len() == 2 {
        format!("20{}", parts[2])
    } else {
        parts[2].to_string()
    };

    format!("{}-{}-{}", year, month, day)
}

fn pad_two(value: &str) -> String {
    if value.len() == 1 {
        format!("0{}", value)
    } else {
        value.to_string()
    }
}

/// 月份标签（YYYY-MM）
pub fn month_label(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// 两个日期之间的周数（可为小数 / 负数）
pub fn weeks_between(from: NaiveDate, to: NaiveDate) -> f64 {
    to.signed_duration_since(from).num_days() as f64 / 7.0
}

// ==========================================
// FortnightKey - 半月周期排序键
// ==========================================
// 字段顺序即比较顺序: (年, 月, 上/下半月)
// 非法标签统一为最小值 (0, 0, 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FortnightKey {
    pub year: i32,
    pub month: u32, // 1-12，未知缩写为 0
    pub half: u8,   // 1 | 2，无法识别为 0
}

impl FortnightKey {
    /// 非法标签的排序值
    pub const MIN: FortnightKey = FortnightKey {
        year: 0,
        month: 0,
        half: 0,
    };

    /// 计算日期所在半月（1-15 日为上半月，16 日起为下半月）
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            half: if date.day() <= 15 { 1 } else { 2 },
        }
    }

    /// 解析半月标签，缺少 " - " 分隔符时返回 MIN
    pub fn parse(label: &str) -> Self {
        let Some((period, ordinal)) = label.split_once(FORTNIGHT_SEPARATOR) else {
            return Self::MIN;
        };

        let (month_abbrev, year_text) = period.trim().split_once('/').unwrap_or((period, ""));
        let month = MONTH_ABBREVIATIONS
            .iter()
            .position(|m| m.eq_ignore_ascii_case(month_abbrev.trim()))
            .map(|idx| idx as u32 + 1)
            .unwrap_or(0);
        let year = year_text.trim().parse::<i32>().unwrap_or(0);
        let half = match ordinal.trim().chars().next() {
            Some('1') => 1,
            Some('2') => 2,
            _ => 0,
        };

        Self { year, month, half }
    }
}

impl fmt::Display for FortnightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abbrev = self
            .month
            .checked_sub(1)
            .and_then(|idx| MONTH_ABBREVIATIONS.get(idx as usize))
            .copied()
            .unwrap_or("???");
        write!(
            f,
            "{}/{}{}{}ª Quinzena",
            abbrev, self.year, FORTNIGHT_SEPARATOR, self.half
        )
    }
}

/// 日期所在半月的标签，如 `Mar/2024 - 1ª Quinzena`
pub fn fortnight_of(date: NaiveDate) -> String {
    FortnightKey::of(date).to_string()
}

/// 半月标签全序比较: 按 (年, 月, 半月) 字典序
pub fn compare_fortnights(a: &str, b: &str) -> Ordering {
    FortnightKey::parse(a).cmp(&FortnightKey::parse(b))
}
