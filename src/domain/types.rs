// ==========================================
// 港口通航压力指数系统 - 领域类型定义
// ==========================================
// 职责: 通航类型 / 动作类型 / 时间桶 / 口径枚举
// ==========================================

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 元数据缺失时导出使用的显式标记
pub const UNKNOWN: &str = "UNKNOWN";

// ==========================================
// 通航类型 (Traffic Type)
// ==========================================
// 由船型分类映射得到,未命中的船型归入 Unclassified（不丢弃）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrafficType {
    Regional,     // 区域支线
    Global,       // 全球干线
    Unclassified, // 未分类
}

impl fmt::Display for TrafficType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficType::Regional => write!(f, "REGIONAL"),
            TrafficType::Global => write!(f, "GLOBAL"),
            TrafficType::Unclassified => write!(f, "UNCLASSIFIED"),
        }
    }
}

impl std::str::FromStr for TrafficType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "REGIONAL" => Ok(TrafficType::Regional),
            "GLOBAL" => Ok(TrafficType::Global),
            "UNCLASSIFIED" | "NAN" => Ok(TrafficType::Unclassified),
            other => Err(format!("未知通航类型: {}", other)),
        }
    }
}

// ==========================================
// 通航类型过滤条件
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficFilter {
    All,
    Only(TrafficType),
}

impl TrafficFilter {
    pub fn accepts(&self, traffic: TrafficType) -> bool {
        match self {
            TrafficFilter::All => true,
            TrafficFilter::Only(wanted) => *wanted == traffic,
        }
    }
}

impl fmt::Display for TrafficFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrafficFilter::All => write!(f, "ALL"),
            TrafficFilter::Only(t) => write!(f, "{}", t),
        }
    }
}

// ==========================================
// 动作类型 (Move Type)
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MoveType {
    Departure,
    Arrival,
    Other(String),
}

impl MoveType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "DEPARTURE" | "DEP" | "D" => MoveType::Departure,
            "ARRIVAL" | "ARR" | "A" => MoveType::Arrival,
            other => MoveType::Other(other.to_string()),
        }
    }

    pub fn is_departure(&self) -> bool {
        matches!(self, MoveType::Departure)
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveType::Departure => write!(f, "DEPARTURE"),
            MoveType::Arrival => write!(f, "ARRIVAL"),
            MoveType::Other(s) => write!(f, "{}", s),
        }
    }
}

// ==========================================
// 时间粒度与时间桶
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Monthly,
    Weekly, // 周一为周起始
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Monthly => write!(f, "monthly"),
            Granularity::Weekly => write!(f, "weekly"),
        }
    }
}

/// 时间桶: 月份 ("YYYY-MM") 或周起始日 ("YYYY-MM-DD", 周一)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeBucket {
    Month { year: i32, month: u32 },
    Week(NaiveDate),
}

impl TimeBucket {
    pub fn month_of(ts: NaiveDateTime) -> Self {
        TimeBucket::Month {
            year: ts.year(),
            month: ts.month(),
        }
    }

    pub fn week_of(ts: NaiveDateTime) -> Self {
        let date = ts.date();
        let offset = date.weekday().num_days_from_monday() as i64;
        TimeBucket::Week(date - Duration::days(offset))
    }

    pub fn of(ts: NaiveDateTime, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Monthly => Self::month_of(ts),
            Granularity::Weekly => Self::week_of(ts),
        }
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBucket::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            TimeBucket::Week(start) => write!(f, "{}", start.format("%Y-%m-%d")),
        }
    }
}

// ==========================================
// 航线活跃度口径
// ==========================================
// Legs: 航线总航段数; ActivePeriods: 有航段的月份数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityBasis {
    #[default]
    Legs,
    ActivePeriods,
}

// ==========================================
// 延误计算单元口径
// ==========================================
// Leg: 逐航段计算; LaneMonth: 按航线-月份汇总中位数计算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayBasis {
    #[default]
    Leg,
    LaneMonth,
}
