// ==========================================
// 港口通航压力指数系统 - 压力指标记录
// ==========================================
// 职责: 港口-月 / 海区-月 / 月度合计 三类终端输出
// ==========================================

use crate::domain::port::PortMeta;
use crate::domain::types::TimeBucket;
use serde::{Deserialize, Serialize};

// ==========================================
// PortStressRecord - 港口月度压力
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortStressRecord {
    pub port_id: i64,
    pub month: TimeBucket,
    pub delayed_ships: f64,
    pub delayed_capacity: f64,
    pub capacity_sum: f64,
    /// 730 * delayed_capacity / capacity_sum; capacity_sum 为 0 时无定义
    pub port_delay: Option<f64>,
    pub contributing_units: usize,
    pub port: Option<PortMeta>,
}

// ==========================================
// RegionStressRecord - 海区月度压力
// ==========================================
// region 为 None 表示港口缺少海区元数据（导出为 UNKNOWN）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStressRecord {
    pub region: Option<String>,
    pub month: TimeBucket,
    pub delayed_ships: f64,
    pub delayed_capacity: f64,
    pub ports: usize,
}

// ==========================================
// MonthlyStressTotal - 全局月度合计
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStressTotal {
    pub month: TimeBucket,
    pub delayed_ships: f64,
    pub delayed_capacity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StressOutput {
    pub port_months: Vec<PortStressRecord>,
    pub region_months: Vec<RegionStressRecord>,
    pub monthly_totals: Vec<MonthlyStressTotal>,
}
