// ==========================================
// 港口通航压力指数系统 - 航线基准时长估计
// ==========================================
// 公式: reference = (k+1) * Q(0.5) - k * Q(0.1), k 默认 2
// 口径: 基于航线全部航段的时长分布（不分时间桶）
// 说明: 每条有航段的航线都给出估计值;
//       活跃度阈值过滤由压力计算阶段统一执行
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::lane::{LaneActivity, LaneBucketStats, LaneKey, LaneProfile, ReferenceLeadTime};
use crate::domain::voyage::Leg;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// 分位数（相邻秩线性插值, pos = p * (n - 1)）; 输入须已升序
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let p = p.clamp(0.0, 1.0);
    let pos = p * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// 中位数（原地排序）
pub fn median(values: &mut [f64]) -> Option<f64> {
    values.sort_by(|a, b| a.total_cmp(b));
    quantile(values, 0.5)
}

pub struct ReferenceEstimator {
    k: f64,
    median_quantile: f64,
    low_quantile: f64,
}

impl ReferenceEstimator {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            k: config.reference_k,
            median_quantile: config.median_quantile,
            low_quantile: config.low_quantile,
        }
    }

    fn extrapolate(&self, mid: f64, low: f64) -> f64 {
        (self.k + 1.0) * mid - self.k * low
    }

    #[instrument(skip_all, fields(legs = legs.len(), lanes = activity.len()))]
    pub fn estimate(
        &self,
        legs: &[Leg],
        activity: &BTreeMap<LaneKey, LaneActivity>,
    ) -> BTreeMap<LaneKey, ReferenceLeadTime> {
        let mut samples: BTreeMap<LaneKey, Vec<f64>> = BTreeMap::new();
        for leg in legs {
            samples.entry(leg.lane()).or_default().push(leg.elapsed_hours);
        }

        let mut references = BTreeMap::new();
        for (lane, mut hours) in samples {
            hours.sort_by(|a, b| a.total_cmp(b));
            let (Some(mid), Some(low)) = (
                quantile(&hours, self.median_quantile),
                quantile(&hours, self.low_quantile),
            ) else {
                continue;
            };

            let lane_activity = activity.get(&lane);
            let reference = ReferenceLeadTime {
                lane,
                reference_hours: self.extrapolate(mid, low),
                median_hours: mid,
                low_hours: low,
                sample_size: hours.len(),
                lane_leg_count: lane_activity.map(|a| a.leg_count).unwrap_or(0),
                lane_active_periods: lane_activity.map(|a| a.active_periods).unwrap_or(0),
            };
            debug!(
                lane = %lane,
                reference_hours = reference.reference_hours,
                sample_size = reference.sample_size,
                "航线基准时长"
            );
            references.insert(lane, reference);
        }

        info!(lanes = references.len(), "基准时长估计完成");
        references
    }

    /// 单航线月度画像: 各月中位时长的 中位数 / Q25 / Q75 及外推指标
    pub fn profile_lane(&self, monthly: &[LaneBucketStats], lane: LaneKey) -> Option<LaneProfile> {
        let series: Vec<_> = monthly
            .iter()
            .filter(|b| b.lane == lane)
            .map(|b| (b.bucket, b.median_elapsed_hours))
            .collect();
        if series.is_empty() {
            return None;
        }

        let mut values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        let median = quantile(&values, 0.5)?;
        let q25 = quantile(&values, 0.25)?;
        let q75 = quantile(&values, 0.75)?;

        Some(LaneProfile {
            lane,
            periods: series.len(),
            median,
            q25,
            q75,
            extrapolated: self.extrapolate(median, q25),
            series,
        })
    }
}
