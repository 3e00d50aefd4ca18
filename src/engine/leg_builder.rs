// ==========================================
// 港口通航压力指数系统 - 航段重建
// ==========================================
// 职责: 同船相邻停靠配对 → 有向航段 + 左连接港口/船舶元数据
// 算法: 按船舶分区 → 按停靠起始时间稳定排序 → 携带"前一停靠"折叠
// 红线: 元数据缺失不丢行（保留为 None 并计数）
//       负时长航段隔离并计数,绝不静默放行
// ==========================================

use crate::config::TrafficClassifier;
use crate::domain::port::PortTable;
use crate::domain::quality::LegCounts;
use crate::domain::types::TrafficType;
use crate::domain::vessel::VesselTable;
use crate::domain::voyage::{Leg, Visit};
use crate::engine::error::{PipelineError, PipelineResult};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

/// 航段重建结果
#[derive(Debug, Clone, Default)]
pub struct LegOutcome {
    pub legs: Vec<Leg>,
    /// 负时长航段（不进入下游）
    pub quarantined: Vec<Leg>,
    pub counts: LegCounts,
}

pub struct LegReconstructor<'a> {
    ports: &'a PortTable,
    vessels: &'a VesselTable,
    classifier: &'a TrafficClassifier,
    fail_on_negative_elapsed: bool,
}

impl<'a> LegReconstructor<'a> {
    pub fn new(
        ports: &'a PortTable,
        vessels: &'a VesselTable,
        classifier: &'a TrafficClassifier,
    ) -> Self {
        Self {
            ports,
            vessels,
            classifier,
            fail_on_negative_elapsed: false,
        }
    }

    pub fn fail_on_negative_elapsed(mut self, enabled: bool) -> Self {
        self.fail_on_negative_elapsed = enabled;
        self
    }

    #[instrument(skip(self, visits), fields(visits = visits.len()))]
    pub fn reconstruct(&self, visits: Vec<Visit>) -> PipelineResult<LegOutcome> {
        let mut outcome = LegOutcome::default();
        outcome.counts.visits_in = visits.len();

        let mut by_vessel: BTreeMap<i64, Vec<Visit>> = BTreeMap::new();
        for visit in visits {
            by_vessel.entry(visit.vessel_id).or_default().push(visit);
        }

        for (_, mut vessel_visits) in by_vessel {
            vessel_visits.sort_by_key(|v| (v.first_timestamp, v.last_timestamp));

            let mut previous: Option<&Visit> = None;
            for current in &vessel_visits {
                let Some(origin) = previous.replace(current) else {
                    outcome.counts.without_predecessor += 1;
                    continue;
                };

                if origin.port_id == current.port_id {
                    outcome.counts.same_port_pairs += 1;
                    continue;
                }

                let leg = self.build_leg(origin, current, &mut outcome.counts);
                if leg.elapsed_hours < 0.0 {
                    outcome.counts.negative_elapsed += 1;
                    warn!(
                        vessel_id = leg.vessel_id,
                        origin = leg.origin_port_id,
                        destination = leg.destination_port_id,
                        elapsed_hours = leg.elapsed_hours,
                        "航段时长为负,已隔离"
                    );
                    if self.fail_on_negative_elapsed {
                        return Err(PipelineError::NegativeElapsed {
                            vessel_id: leg.vessel_id,
                            origin: leg.origin_port_id,
                            destination: leg.destination_port_id,
                            elapsed_hours: leg.elapsed_hours,
                        });
                    }
                    outcome.quarantined.push(leg);
                    continue;
                }

                outcome.legs.push(leg);
            }
        }

        outcome.counts.legs_out = outcome.legs.len();
        let counts = &outcome.counts;
        info!(
            without_predecessor = counts.without_predecessor,
            same_port_pairs = counts.same_port_pairs,
            negative_elapsed = counts.negative_elapsed,
            unknown_origin_port = counts.unknown_origin_port,
            unknown_destination_port = counts.unknown_destination_port,
            unknown_vessel = counts.unknown_vessel,
            legs_out = counts.legs_out,
            "航段重建完成"
        );
        Ok(outcome)
    }

    fn build_leg(&self, origin: &Visit, destination: &Visit, counts: &mut LegCounts) -> Leg {
        let elapsed = destination.last_timestamp - origin.last_timestamp;
        let elapsed_hours = elapsed.num_seconds() as f64 / 3600.0;

        let origin_meta = self.ports.get(origin.port_id).cloned();
        if origin_meta.is_none() {
            counts.unknown_origin_port += 1;
        }
        let destination_meta = self.ports.get(destination.port_id).cloned();
        if destination_meta.is_none() {
            counts.unknown_destination_port += 1;
        }

        let vessel = self.vessels.get(destination.vessel_id);
        if vessel.is_none() {
            counts.unknown_vessel += 1;
        }
        let vessel_class = vessel.and_then(|v| v.vessel_class.clone());
        let traffic_type = self.classifier.classify(vessel_class.as_deref());
        if traffic_type == TrafficType::Unclassified {
            counts.unclassified_traffic += 1;
        }

        Leg {
            vessel_id: destination.vessel_id,
            imo: destination.imo.or(origin.imo),
            origin_port_id: origin.port_id,
            destination_port_id: destination.port_id,
            origin_departure: origin.last_timestamp,
            destination_departure: destination.last_timestamp,
            elapsed_hours,
            vessel_class,
            capacity_teu: vessel.and_then(|v| v.capacity_teu),
            gross_tonnage: vessel.and_then(|v| v.gross_tonnage),
            traffic_type,
            origin: origin_meta,
            destination: destination_meta,
        }
    }
}
