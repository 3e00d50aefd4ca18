// ==========================================
// 港口通航压力指数系统 - 航线汇总
// ==========================================
// 职责: 航段 → (起运港, 目的港, 时间桶) 汇总表
// 口径: 时长取中位数（抗长尾）, 航段数/运力取计数与求和
// 说明: 单次遍历同时计算 计数 / 去重船舶 / 求和 / 中位数 / 均值
// ==========================================

use crate::domain::lane::{LaneActivity, LaneBucketStats, LaneKey};
use crate::domain::port::PortTable;
use crate::domain::types::{Granularity, TimeBucket};
use crate::domain::voyage::Leg;
use crate::engine::reference::median;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, instrument};

#[derive(Default)]
struct BucketAcc {
    elapsed: Vec<f64>,
    vessels: BTreeSet<i64>,
    capacity_sum: f64,
    legs_without_capacity: usize,
}

#[derive(Default)]
struct ActivityAcc {
    leg_count: usize,
    active_periods: usize,
    vessels: BTreeSet<i64>,
    medians: Vec<f64>,
    capacities: Vec<f64>,
}

pub struct LaneAggregator;

impl LaneAggregator {
    /// 航段 → 航线 x 时间桶 汇总（按 航线, 时间桶 升序）
    #[instrument(skip(legs, ports), fields(legs = legs.len(), granularity = %granularity))]
    pub fn aggregate(
        legs: &[Leg],
        granularity: Granularity,
        ports: &PortTable,
    ) -> Vec<LaneBucketStats> {
        let mut groups: BTreeMap<(LaneKey, TimeBucket), BucketAcc> = BTreeMap::new();

        for leg in legs {
            let acc = groups
                .entry((leg.lane(), leg.bucket(granularity)))
                .or_default();
            acc.elapsed.push(leg.elapsed_hours);
            acc.vessels.insert(leg.vessel_id);
            match leg.capacity_teu {
                Some(teu) => acc.capacity_sum += teu,
                None => acc.legs_without_capacity += 1,
            }
        }

        let stats: Vec<LaneBucketStats> = groups
            .into_iter()
            .map(|((lane, bucket), mut acc)| {
                let leg_count = acc.elapsed.len();
                let mean = acc.elapsed.iter().sum::<f64>() / leg_count as f64;
                LaneBucketStats {
                    lane,
                    bucket,
                    leg_count,
                    distinct_vessels: acc.vessels.len(),
                    vessel_ids: acc.vessels,
                    capacity_sum: acc.capacity_sum,
                    legs_without_capacity: acc.legs_without_capacity,
                    median_elapsed_hours: median(&mut acc.elapsed).unwrap_or(0.0),
                    mean_elapsed_hours: mean,
                    origin: ports.get(lane.origin).cloned(),
                    destination: ports.get(lane.destination).cloned(),
                }
            })
            .collect();

        info!(rows = stats.len(), "航线汇总完成");
        stats
    }

    /// 跨时间桶的航线活跃度: 航段总数（求和）/ 活跃时间桶数（计数）/ 船舶数（跨桶去重）
    pub fn lane_activity(buckets: &[LaneBucketStats]) -> BTreeMap<LaneKey, LaneActivity> {
        let mut groups: BTreeMap<LaneKey, ActivityAcc> = BTreeMap::new();

        for bucket in buckets {
            let acc = groups.entry(bucket.lane).or_default();
            acc.leg_count += bucket.leg_count;
            acc.active_periods += 1;
            acc.vessels.extend(bucket.vessel_ids.iter().copied());
            acc.medians.push(bucket.median_elapsed_hours);
            acc.capacities.push(bucket.capacity_sum);
        }

        groups
            .into_iter()
            .map(|(lane, mut acc)| {
                let activity = LaneActivity {
                    lane,
                    leg_count: acc.leg_count,
                    active_periods: acc.active_periods,
                    distinct_vessels: acc.vessels.len(),
                    median_of_bucket_medians: median(&mut acc.medians).unwrap_or(0.0),
                    median_bucket_capacity: median(&mut acc.capacities).unwrap_or(0.0),
                };
                (lane, activity)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::port::PortMeta;
    use crate::domain::types::TrafficType;
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn leg(vessel_id: i64, o: i64, d: i64, arrive: NaiveDateTime, hours: f64, teu: Option<f64>) -> Leg {
        Leg {
            vessel_id,
            imo: None,
            origin_port_id: o,
            destination_port_id: d,
            origin_departure: arrive - Duration::hours(hours as i64),
            destination_departure: arrive,
            elapsed_hours: hours,
            vessel_class: None,
            capacity_teu: teu,
            gross_tonnage: None,
            traffic_type: TrafficType::Unclassified,
            origin: None,
            destination: None,
        }
    }

    fn sample() -> Vec<Leg> {
        vec![
            leg(1, 1, 2, at(1, 5), 10.0, Some(100.0)),
            leg(2, 1, 2, at(1, 20), 30.0, Some(200.0)),
            leg(1, 1, 2, at(1, 25), 50.0, None),
            leg(3, 1, 2, at(2, 3), 40.0, Some(50.0)),
            leg(3, 2, 1, at(1, 7), 12.0, Some(50.0)),
        ]
    }

    #[test]
    fn test_monthly_aggregation() {
        let ports = PortTable::from_records(vec![PortMeta::new(1)]);
        let stats = LaneAggregator::aggregate(&sample(), Granularity::Monthly, &ports);

        assert_eq!(stats.len(), 3);
        let jan = &stats[0];
        assert_eq!(jan.lane, LaneKey::new(1, 2));
        assert_eq!(jan.bucket.to_string(), "2021-01");
        assert_eq!(jan.leg_count, 3);
        assert_eq!(jan.distinct_vessels, 2);
        assert_eq!(jan.capacity_sum, 300.0);
        assert_eq!(jan.legs_without_capacity, 1);
        assert_eq!(jan.median_elapsed_hours, 30.0);
        assert_eq!(jan.mean_elapsed_hours, 30.0);
        assert!(jan.origin.is_some());
        assert!(jan.destination.is_none());

        assert_eq!(stats[1].bucket.to_string(), "2021-02");
        assert_eq!(stats[2].lane, LaneKey::new(2, 1));
    }

    #[test]
    fn test_weekly_bucket_starts_monday() {
        let stats = LaneAggregator::aggregate(&sample(), Granularity::Weekly, &PortTable::default());
        // 2021-01-05 为周二 → 周起始 2021-01-04
        assert_eq!(stats[0].bucket.to_string(), "2021-01-04");
    }

    #[test]
    fn test_lane_activity_sum_and_count() {
        let stats = LaneAggregator::aggregate(&sample(), Granularity::Monthly, &PortTable::default());
        let activity = LaneAggregator::lane_activity(&stats);

        let lane = &activity[&LaneKey::new(1, 2)];
        assert_eq!(lane.leg_count, 4);
        assert_eq!(lane.active_periods, 2);
        assert_eq!(lane.distinct_vessels, 3);
        assert_eq!(lane.median_of_bucket_medians, 35.0);
        assert_eq!(lane.median_bucket_capacity, 175.0);

        assert_eq!(activity[&LaneKey::new(2, 1)].leg_count, 1);
    }

    #[test]
    fn test_lane_activity_counts_vessel_once_across_months() {
        let legs = vec![
            leg(7, 1, 2, at(1, 10), 20.0, Some(100.0)),
            leg(7, 1, 2, at(2, 10), 22.0, Some(100.0)),
            leg(7, 1, 2, at(3, 10), 24.0, Some(100.0)),
        ];
        let stats = LaneAggregator::aggregate(&legs, Granularity::Monthly, &PortTable::default());
        assert_eq!(stats.len(), 3);
        assert!(stats.iter().all(|s| s.distinct_vessels == 1));

        let activity = LaneAggregator::lane_activity(&stats);
        let lane = &activity[&LaneKey::new(1, 2)];
        assert_eq!(lane.active_periods, 3);
        assert_eq!(lane.leg_count, 3);
        assert_eq!(lane.distinct_vessels, 1);
    }
}
