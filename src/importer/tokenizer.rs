// ==========================================
// 蛋鸡生产记录核心 - 表格文本分词器
// ==========================================
// 职责: 文本 → 表头 + 数据行（字符串矩阵）
// 规则: 去 BOM / 丢弃空行 / 表头含 ';' 则用 ';' 否则用 ','
//       引号感知切分交给 csv crate（无表头 + flexible）
// ==========================================

use csv::{ReaderBuilder, Trim};
use tracing::debug;

/// UTF-8 BOM
const BOM: char = '\u{feff}';

/// 分词结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabularText {
    pub delimiter: u8,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>, // 数据行（不含表头）
}

/// 去掉首行的 BOM
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// 按 \n / \r\n 切行，丢弃空白行
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|line| !line.trim().is_empty()).collect()
}

/// 分隔符探测（只看表头行）
pub fn detect_delimiter(header_line: &str) -> u8 {
    if header_line.contains(';') {
        b';'
    } else {
        b','
    }
}

/// 单字段清洗（仅用于朴素切分的退化路径）: 去空白；被引号包裹时去掉一层首尾引号并把 "" 还原为 "
pub fn clean_token(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\"").trim().to_string(),
        None => trimmed.to_string(),
    }
}

/// 去掉字段开头、紧挨起始引号之前的空白
///
/// csv 只在字段首字符为引号时按引号字段处理，`a; "b;c"` 需先收紧成 `a;"b;c"`
pub fn tighten_quoted_fields(line: &str, delimiter: u8) -> String {
    let delimiter = delimiter as char;
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    let mut at_field_start = true;

    while let Some(c) = chars.next() {
        if in_quotes {
            out.push(c);
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    out.push('"');
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        if at_field_start && c.is_whitespace() && c != delimiter {
            let mut run = String::from(c);
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() && next != delimiter {
                    run.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if chars.peek() != Some(&'"') {
                out.push_str(&run);
                at_field_start = false;
            }
            continue;
        }

        out.push(c);
        if c == delimiter {
            at_field_start = true;
        } else {
            in_quotes = at_field_start && c == '"';
            at_field_start = false;
        }
    }

    out
}

/// 引号感知地切分一行
///
/// 反转义只做一次（csv 完成），字段内容本身首尾带引号时原样保留
pub fn tokenize_line(line: &str, delimiter: u8) -> Vec<String> {
    let tightened = tighten_quoted_fields(line, delimiter);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .delimiter(delimiter)
        .from_reader(tightened.as_bytes());

    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(str::to_string).collect(),
        Some(Err(e)) => {
            // 退化为朴素切分
            debug!(error = %e, "CSV 行解析失败，按分隔符直接切分");
            line.split(delimiter as char).map(clean_token).collect()
        }
        None => Vec::new(),
    }
}

/// 整段文本分词
pub fn tokenize(text: &str) -> TabularText {
    let lines = split_lines(strip_bom(text));
    let Some((header_line, body)) = lines.split_first() else {
        return TabularText {
            delimiter: b',',
            ..Default::default()
        };
    };

    let header_line = strip_bom(header_line.trim_start());
    let delimiter = detect_delimiter(header_line);

    TabularText {
        delimiter,
        headers: tokenize_line(header_line, delimiter),
        rows: body
            .iter()
            .map(|line| tokenize_line(line, delimiter))
            .collect(),
    }
}
