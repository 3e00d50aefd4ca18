// ==========================================
// 港口通航压力指数系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / UPPER / NULL 标准化 / 数值与时间解析
// ==========================================

use chrono::{DateTime, NaiveDateTime};

pub struct DataCleaner;

/// 视为空值的占位文本
const NULL_MARKERS: &[&str] = &["", "NAN", "NULL", "NONE", "NA", "N/A", "NAT"];

/// 无时区时间格式（按顺序尝试）
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y%m%d%H%M%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

impl DataCleaner {
    pub fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    /// 标准化 NULL 值（空白 / nan / NULL 等 → None）
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if NULL_MARKERS.contains(&trimmed.to_uppercase().as_str()) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 解析小数（兼容逗号小数点,如 "12,5"）
    pub fn parse_decimal(&self, value: &str) -> Option<f64> {
        let trimmed = value.trim();
        if let Ok(v) = trimmed.parse::<f64>() {
            return Some(v);
        }
        if trimmed.contains(',') && !trimmed.contains('.') {
            return trimmed.replace(',', ".").parse::<f64>().ok();
        }
        None
    }

    /// 解析整数 ID（兼容 "123.0" 形式的浮点导出）
    pub fn parse_id(&self, value: &str) -> Option<i64> {
        let trimmed = value.trim();
        if let Ok(v) = trimmed.parse::<i64>() {
            return Some(v);
        }
        match self.parse_decimal(trimmed) {
            Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                Some(v as i64)
            }
            _ => None,
        }
    }

    /// 解析 UTC 时间戳; 带时区偏移的转换为 UTC 后去除时区
    pub fn parse_timestamp(&self, value: &str) -> Option<NaiveDateTime> {
        let trimmed = value.trim();
        let trimmed = trimmed
            .strip_suffix(" UTC")
            .or_else(|| trimmed.strip_suffix(" GMT"))
            .unwrap_or(trimmed);

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Some(dt.naive_utc());
        }
        if let Ok(dt) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Some(dt.naive_utc());
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
    }
}
