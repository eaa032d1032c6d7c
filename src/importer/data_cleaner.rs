// ==========================================
// 蛋鸡生产记录核心 - 数据清洗器实现
// ==========================================
// 职责: 单元格文本 → 类型化字段（数值 / 日期 / 鸡舍 / 羽毛评级 / ID）
// 红线: 全部静默恢复，不返回错误；无法解析时取默认值或 None
// 区域: 小数逗号（"1,5" → 1.5）、日/月/年日期
// ==========================================

use crate::domain::types::{Aviary, FeatheringQuality};
use crate::engine::temporal::{parse_local_date_with, to_naive_date};
use chrono::NaiveDate;
use uuid::Uuid;

/// 羽毛评级关键字（顺序即优先级，"muito boa" 必须先于 "boa"）
const FEATHERING_KEYWORDS: &[(FeatheringQuality, &[&str])] = &[
    (
        FeatheringQuality::VeryGood,
        &["muito boa", "muito bom", "ótim", "otim"],
    ),
    (FeatheringQuality::Good, &["boa", "bom"]),
    (FeatheringQuality::Regular, &["regular"]),
    (FeatheringQuality::Poor, &["ruim"]),
    (FeatheringQuality::VeryPoor, &["péssim", "pessim"]),
];

pub struct DataCleaner;

impl DataCleaner {
    /// 文本标准化（空白 → None）
    pub fn normalize_text(&self, value: Option<&str>) -> Option<String> {
        value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
    }

    /// 数值解析: ',' → '.' 后按浮点解析；空白 / 非法 / 非有限值 → None
    pub fn parse_number(&self, value: Option<&str>) -> Option<f64> {
        let text = self.normalize_text(value)?;
        text.replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// 必填数值（缺失 → 0）
    pub fn parse_required_number(&self, value: Option<&str>) -> f64 {
        self.parse_number(value).unwrap_or(0.0)
    }

    /// 可空计数（四舍五入；负数 → 0）
    pub fn parse_optional_count(&self, value: Option<&str>) -> Option<u32> {
        self.parse_number(value).map(|v| {
            let rounded = v.round();
            if rounded <= 0.0 {
                0
            } else if rounded >= u32::MAX as f64 {
                u32::MAX
            } else {
                rounded as u32
            }
        })
    }

    /// 必填计数（缺失 → 0）
    pub fn parse_count(&self, value: Option<&str>) -> u32 {
        self.parse_optional_count(value).unwrap_or(0)
    }

    /// 日期解析: 展示形式 → ISO → NaiveDate；空白取 fallback，非法 → None
    pub fn parse_date(&self, value: Option<&str>, fallback: NaiveDate) -> Option<NaiveDate> {
        let iso = parse_local_date_with(value.unwrap_or(""), fallback);
        to_naive_date(&iso)
    }

    /// 鸡舍识别: 依次查找数字 1 / 2 / 3 / 4，均未出现取默认鸡舍
    pub fn parse_aviary(&self, value: Option<&str>, default: Aviary) -> Aviary {
        let Some(text) = value else {
            return default;
        };
        Aviary::ALL
            .into_iter()
            .find(|aviary| {
                let digit = char::from(b'0' + aviary.number());
                text.contains(digit)
            })
            .unwrap_or(default)
    }

    /// 羽毛评级: 小写后按关键字优先级做子串匹配
    pub fn parse_feathering(
        &self,
        value: Option<&str>,
        default: FeatheringQuality,
    ) -> FeatheringQuality {
        let Some(text) = value.map(str::to_lowercase) else {
            return default;
        };
        FEATHERING_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(quality, _)| *quality)
            .unwrap_or(default)
    }

    /// ID: 长度超过阈值时沿用，否则生成 UUID v4
    pub fn parse_identifier(&self, value: Option<&str>, min_len: usize) -> String {
        match self.normalize_text(value) {
            Some(id) if id.chars().count() > min_len => id,
            _ => Uuid::new_v4().to_string(),
        }
    }
}
