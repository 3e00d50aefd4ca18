// ==========================================
// 港口通航压力指数系统 - 航线与基准时长
// ==========================================

use crate::domain::port::PortMeta;
use crate::domain::types::TimeBucket;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// 航线键: (起运港, 目的港)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LaneKey {
    pub origin: i64,
    pub destination: i64,
}

impl LaneKey {
    pub fn new(origin: i64, destination: i64) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

impl fmt::Display for LaneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.origin, self.destination)
    }
}

// ==========================================
// LaneBucketStats - 航线 x 时间桶 汇总
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneBucketStats {
    pub lane: LaneKey,
    pub bucket: TimeBucket,
    pub leg_count: usize,
    pub distinct_vessels: usize,
    #[serde(skip)]
    pub vessel_ids: BTreeSet<i64>, // 桶内船舶集合,供跨桶去重
    pub capacity_sum: f64,
    pub legs_without_capacity: usize,
    pub median_elapsed_hours: f64,
    pub mean_elapsed_hours: f64,
    pub origin: Option<PortMeta>,
    pub destination: Option<PortMeta>,
}

// ==========================================
// LaneActivity - 航线整体活跃度（跨时间桶）
// ==========================================
// leg_count 为各桶求和, active_periods 为桶计数, distinct_vessels 为跨桶去重船舶数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneActivity {
    pub lane: LaneKey,
    pub leg_count: usize,
    pub active_periods: usize,
    pub distinct_vessels: usize,
    pub median_of_bucket_medians: f64,
    pub median_bucket_capacity: f64,
}

// ==========================================
// ReferenceLeadTime - 航线基准时长
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLeadTime {
    pub lane: LaneKey,
    pub reference_hours: f64,
    pub median_hours: f64,    // Q(0.5)
    pub low_hours: f64,       // Q(0.1)
    pub sample_size: usize,   // 参与分位数计算的航段数
    pub lane_leg_count: usize,      // 航线活跃度（航段总数）
    pub lane_active_periods: usize, // 航线活跃度（活跃月份数）
}

// ==========================================
// LaneProfile - 单航线月度中位数画像
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneProfile {
    pub lane: LaneKey,
    pub periods: usize,
    pub median: f64,
    pub q25: f64,
    pub q75: f64,
    pub extrapolated: f64, // 3 * median - 2 * q25
    pub series: Vec<(TimeBucket, f64)>, // 各月中位时长
}
