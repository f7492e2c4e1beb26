// ==========================================
// 储备分配系统 - 单元格取值转换
// ==========================================
// 职责: 文本单元格 → 整数 / 实数 / 日期
// 规则: 转换失败一律取默认值（0 / 0.0 / None），不报错
// ==========================================

use chrono::NaiveDate;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// 去除空白（含不间断空格），小数逗号换成点
fn normalize_number(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

/// 整数: 直接解析 → 清洗后按实数解析再截断 → 0
pub fn to_int(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return v;
    }
    match normalize_number(trimmed).parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc() as i64,
        _ => 0,
    }
}

/// 实数: 直接解析 → 清洗后解析 → 0.0
pub fn to_float(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let parsed = trimmed
        .parse::<f64>()
        .or_else(|_| normalize_number(trimmed).parse::<f64>());
    match parsed {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// 日期: `YYYY-MM-DD` 或 `DD.MM.YYYY`，允许带时间部分
pub fn to_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let date_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}
