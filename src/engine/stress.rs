// ==========================================
// 港口通航压力指数系统 - 压力/延误计算
// ==========================================
// 步骤:
//   1. delay = max(0, elapsed - reference)（半波整流,不出现负延误）
//   2. 延误船舶 = 数量 * delay / 730, 延误运力 = 运力 * delay / 730
//   3. (目的港, 月) 汇总 + port_delay = 730 * 延误运力 / 运力合计
//   4. 连接海区元数据 → (海区, 月) 汇总; 全局月度合计
// 红线: 无基准时长的单元整体排除,绝不按零延误处理
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::lane::{LaneBucketStats, LaneKey, ReferenceLeadTime};
use crate::domain::port::PortTable;
use crate::domain::quality::StressCounts;
use crate::domain::stress::{
    MonthlyStressTotal, PortStressRecord, RegionStressRecord, StressOutput,
};
use crate::domain::types::{ActivityBasis, DelayBasis, TimeBucket};
use crate::domain::voyage::Leg;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, instrument};

/// 延误计算单元（航段 或 航线-月）
#[derive(Debug, Clone, Copy)]
struct StressUnit {
    lane: LaneKey,
    month: TimeBucket,
    count: f64,
    capacity: Option<f64>,
    elapsed_hours: f64,
}

#[derive(Default)]
struct PortAcc {
    delayed_ships: f64,
    delayed_capacity: f64,
    capacity_sum: f64,
    units: usize,
}

#[derive(Default)]
struct RegionAcc {
    delayed_ships: f64,
    delayed_capacity: f64,
    ports: usize,
}

pub struct StressCalculator {
    hours_per_month: f64,
    min_lane_activity: usize,
    activity_basis: ActivityBasis,
    delay_basis: DelayBasis,
}

impl StressCalculator {
    pub fn new(config: &PipelineConfig) -> Self {
        Self {
            hours_per_month: config.hours_per_month,
            min_lane_activity: config.min_lane_activity,
            activity_basis: config.activity_basis,
            delay_basis: config.delay_basis,
        }
    }

    /// 半波整流延误
    pub fn delay(elapsed_hours: f64, reference_hours: f64) -> f64 {
        (elapsed_hours - reference_hours).max(0.0)
    }

    fn lane_activity(&self, reference: &ReferenceLeadTime) -> usize {
        match self.activity_basis {
            ActivityBasis::Legs => reference.lane_leg_count,
            ActivityBasis::ActivePeriods => reference.lane_active_periods,
        }
    }

    fn units(&self, legs: &[Leg], monthly: &[LaneBucketStats]) -> Vec<StressUnit> {
        match self.delay_basis {
            DelayBasis::Leg => legs
                .iter()
                .map(|leg| StressUnit {
                    lane: leg.lane(),
                    month: leg.month(),
                    count: 1.0,
                    capacity: leg.capacity_teu,
                    elapsed_hours: leg.elapsed_hours,
                })
                .collect(),
            DelayBasis::LaneMonth => monthly
                .iter()
                .map(|bucket| StressUnit {
                    lane: bucket.lane,
                    month: bucket.bucket,
                    count: bucket.leg_count as f64,
                    capacity: Some(bucket.capacity_sum),
                    elapsed_hours: bucket.median_elapsed_hours,
                })
                .collect(),
        }
    }

    #[instrument(skip_all, fields(basis = ?self.delay_basis, legs = legs.len()))]
    pub fn compute(
        &self,
        legs: &[Leg],
        monthly: &[LaneBucketStats],
        references: &BTreeMap<LaneKey, ReferenceLeadTime>,
        ports: &PortTable,
    ) -> (StressOutput, StressCounts) {
        let units = self.units(legs, monthly);
        let mut counts = StressCounts {
            units_in: units.len(),
            ..Default::default()
        };

        // ===== 1-3: 单元延误 → (目的港, 月) =====
        let mut by_port: BTreeMap<(i64, TimeBucket), PortAcc> = BTreeMap::new();
        for unit in &units {
            let Some(reference) = references.get(&unit.lane) else {
                counts.missing_reference += 1;
                continue;
            };
            if self.lane_activity(reference) <= self.min_lane_activity {
                counts.insufficient_sample += 1;
                continue;
            }
            let capacity = match unit.capacity {
                Some(c) if c > 0.0 => c,
                _ => {
                    counts.invalid_capacity += 1;
                    continue;
                }
            };

            let delay = Self::delay(unit.elapsed_hours, reference.reference_hours);
            counts.units_used += 1;
            if delay > 0.0 {
                counts.delayed_units += 1;
            }

            let acc = by_port
                .entry((unit.lane.destination, unit.month))
                .or_default();
            acc.delayed_ships += unit.count * delay / self.hours_per_month;
            acc.delayed_capacity += capacity * delay / self.hours_per_month;
            acc.capacity_sum += capacity;
            acc.units += 1;
        }

        let port_months: Vec<PortStressRecord> = by_port
            .into_iter()
            .map(|((port_id, month), acc)| PortStressRecord {
                port_id,
                month,
                delayed_ships: acc.delayed_ships,
                delayed_capacity: acc.delayed_capacity,
                capacity_sum: acc.capacity_sum,
                port_delay: (acc.capacity_sum > 0.0)
                    .then(|| self.hours_per_month * acc.delayed_capacity / acc.capacity_sum),
                contributing_units: acc.units,
                port: ports.get(port_id).cloned(),
            })
            .collect();

        // ===== 4: 海区-月 与 全局月度合计 =====
        let mut by_region: BTreeMap<(Option<String>, TimeBucket), RegionAcc> = BTreeMap::new();
        let mut by_month: BTreeMap<TimeBucket, (f64, f64)> = BTreeMap::new();
        let mut without_region: BTreeSet<i64> = BTreeSet::new();

        for record in &port_months {
            let region = ports.region_of(record.port_id).map(str::to_string);
            if region.is_none() {
                without_region.insert(record.port_id);
            }
            let acc = by_region.entry((region, record.month)).or_default();
            acc.delayed_ships += record.delayed_ships;
            acc.delayed_capacity += record.delayed_capacity;
            acc.ports += 1;

            let total = by_month.entry(record.month).or_insert((0.0, 0.0));
            total.0 += record.delayed_ships;
            total.1 += record.delayed_capacity;
        }
        counts.ports_without_region = without_region.len();

        let region_months = by_region
            .into_iter()
            .map(|((region, month), acc)| RegionStressRecord {
                region,
                month,
                delayed_ships: acc.delayed_ships,
                delayed_capacity: acc.delayed_capacity,
                ports: acc.ports,
            })
            .collect();

        let monthly_totals = by_month
            .into_iter()
            .map(|(month, (delayed_ships, delayed_capacity))| MonthlyStressTotal {
                month,
                delayed_ships,
                delayed_capacity,
            })
            .collect();

        info!(
            units_in = counts.units_in,
            missing_reference = counts.missing_reference,
            insufficient_sample = counts.insufficient_sample,
            invalid_capacity = counts.invalid_capacity,
            units_used = counts.units_used,
            delayed_units = counts.delayed_units,
            port_months = port_months.len(),
            "压力计算完成"
        );

        (
            StressOutput {
                port_months,
                region_months,
                monthly_totals,
            },
            counts,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::port::PortMeta;
    use crate::domain::types::TrafficType;
    use chrono::{Duration, NaiveDate};

    fn leg(o: i64, d: i64, day: u32, hours: f64, teu: Option<f64>) -> Leg {
        let arrive = NaiveDate::from_ymd_opt(2021, 5, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Leg {
            vessel_id: day as i64,
            imo: None,
            origin_port_id: o,
            destination_port_id: d,
            origin_departure: arrive - Duration::hours(hours as i64),
            destination_departure: arrive,
            elapsed_hours: hours,
            vessel_class: None,
            capacity_teu: teu,
            gross_tonnage: None,
            traffic_type: TrafficType::Global,
            origin: None,
            destination: None,
        }
    }

    fn reference(o: i64, d: i64, hours: f64, leg_count: usize) -> (LaneKey, ReferenceLeadTime) {
        let lane = LaneKey::new(o, d);
        (
            lane,
            ReferenceLeadTime {
                lane,
                reference_hours: hours,
                median_hours: hours,
                low_hours: hours,
                sample_size: leg_count,
                lane_leg_count: leg_count,
                lane_active_periods: 1,
            },
        )
    }

    fn ports() -> PortTable {
        let mut busan = PortMeta::new(2);
        busan.maritime_region = Some("East Asia".to_string());
        PortTable::from_records(vec![busan])
    }

    #[test]
    fn test_delay_is_rectified() {
        assert_eq!(StressCalculator::delay(10.0, 24.0), 0.0);
        assert_eq!(StressCalculator::delay(24.0, 24.0), 0.0);
        assert_eq!(StressCalculator::delay(100.0, 24.0), 76.0);
    }

    #[test]
    fn test_port_and_region_aggregation() {
        let legs = vec![
            leg(1, 2, 3, 24.0, Some(1000.0)),
            leg(1, 2, 4, 97.0, Some(2000.0)),
            leg(3, 2, 5, 10.0, Some(500.0)),
        ];
        let references: BTreeMap<_, _> =
            [reference(1, 2, 24.0, 20), reference(3, 2, 48.0, 11)].into_iter().collect();

        let (output, counts) = StressCalculator::new(&PipelineConfig::default())
            .compute(&legs, &[], &references, &ports());

        assert_eq!(output.port_months.len(), 1);
        let record = &output.port_months[0];
        assert_eq!(record.port_id, 2);
        assert_eq!(record.month.to_string(), "2021-05");
        assert!((record.delayed_ships - 73.0 / 730.0).abs() < 1e-12);
        assert!((record.delayed_capacity - 2000.0 * 73.0 / 730.0).abs() < 1e-9);
        assert_eq!(record.capacity_sum, 3500.0);
        let expected_port_delay = 730.0 * record.delayed_capacity / 3500.0;
        assert!((record.port_delay.unwrap() - expected_port_delay).abs() < 1e-9);
        assert_eq!(record.contributing_units, 3);

        assert_eq!(output.region_months.len(), 1);
        assert_eq!(output.region_months[0].region.as_deref(), Some("East Asia"));
        assert_eq!(output.monthly_totals.len(), 1);

        assert_eq!(counts.units_used, 3);
        assert_eq!(counts.delayed_units, 1);
        assert_eq!(counts.ports_without_region, 0);
    }

    #[test]
    fn test_exclusions_are_counted_not_zeroed() {
        let legs = vec![
            leg(1, 2, 3, 200.0, Some(1000.0)), // 无基准
            leg(3, 2, 4, 200.0, Some(1000.0)), // 活跃度 = 10
            leg(5, 2, 5, 200.0, None),         // 运力缺失
            leg(5, 2, 6, 200.0, Some(0.0)),    // 运力为 0
        ];
        let references: BTreeMap<_, _> =
            [reference(3, 2, 24.0, 10), reference(5, 2, 24.0, 11)].into_iter().collect();

        let (output, counts) = StressCalculator::new(&PipelineConfig::default())
            .compute(&legs, &[], &references, &ports());

        assert!(output.port_months.is_empty());
        assert_eq!(counts.units_in, 4);
        assert_eq!(counts.missing_reference, 1);
        assert_eq!(counts.insufficient_sample, 1);
        assert_eq!(counts.invalid_capacity, 2);
        assert_eq!(counts.units_used, 0);
    }

    #[test]
    fn test_unknown_region_grouped_separately() {
        let legs = vec![leg(1, 7, 3, 48.0, Some(100.0))];
        let references: BTreeMap<_, _> = [reference(1, 7, 24.0, 11)].into_iter().collect();

        let (output, counts) = StressCalculator::new(&PipelineConfig::default())
            .compute(&legs, &[], &references, &ports());

        assert_eq!(output.region_months.len(), 1);
        assert_eq!(output.region_months[0].region, None);
        assert!(output.port_months[0].port.is_none());
        assert_eq!(counts.ports_without_region, 1);
    }

    #[test]
    fn test_lane_month_basis_uses_bucket_median() {
        let lane = LaneKey::new(1, 2);
        let monthly = vec![LaneBucketStats {
            lane,
            bucket: TimeBucket::Month { year: 2021, month: 5 },
            leg_count: 4,
            distinct_vessels: 4,
            vessel_ids: [1, 2, 3, 4].into_iter().collect(),
            capacity_sum: 8000.0,
            legs_without_capacity: 0,
            median_elapsed_hours: 100.0,
            mean_elapsed_hours: 120.0,
            origin: None,
            destination: None,
        }];
        let references: BTreeMap<_, _> = [reference(1, 2, 27.0, 40)].into_iter().collect();
        let config = PipelineConfig {
            delay_basis: DelayBasis::LaneMonth,
            ..PipelineConfig::default()
        };

        let (output, counts) = StressCalculator::new(&config).compute(&[], &monthly, &references, &ports());

        let record = &output.port_months[0];
        assert!((record.delayed_ships - 4.0 * 73.0 / 730.0).abs() < 1e-12);
        assert!((record.delayed_capacity - 8000.0 * 73.0 / 730.0).abs() < 1e-9);
        assert_eq!(counts.units_in, 1);
    }

    #[test]
    fn test_active_periods_basis() {
        let legs = vec![leg(1, 2, 3, 200.0, Some(1000.0))];
        // 航段数充足但活跃月份数仅 1
        let references: BTreeMap<_, _> = [reference(1, 2, 24.0, 500)].into_iter().collect();
        let config = PipelineConfig {
            activity_basis: ActivityBasis::ActivePeriods,
            ..PipelineConfig::default()
        };

        let (output, counts) = StressCalculator::new(&config).compute(&legs, &[], &references, &ports());
        assert!(output.port_months.is_empty());
        assert_eq!(counts.insufficient_sample, 1);
    }
}
