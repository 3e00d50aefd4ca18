// ==========================================
// 港口通航压力指数系统 - 连续观测折叠
// ==========================================
// 职责: 同一船舶连续同港离港观测 → 一次停靠 (Visit)
// 算法: 按船舶分区 → 时间稳定排序 → 携带"当前停靠"状态折叠
// 口径: 全窗口仅一条离港观测的船舶不产生停靠（计数上报）
// ==========================================

use crate::domain::event::Event;
use crate::domain::quality::CollapseCounts;
use crate::domain::voyage::Visit;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

pub struct RunCollapser;

impl RunCollapser {
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, events), fields(events = events.len()))]
    pub fn collapse(&self, events: Vec<Event>) -> (Vec<Visit>, CollapseCounts) {
        let mut counts = CollapseCounts {
            events_in: events.len(),
            ..Default::default()
        };

        // 按船舶分区（BTreeMap 保证输出顺序确定）
        let mut by_vessel: BTreeMap<i64, Vec<Event>> = BTreeMap::new();
        for event in events {
            by_vessel.entry(event.vessel_id).or_default().push(event);
        }
        counts.vessels = by_vessel.len();

        let mut visits = Vec::new();
        for (vessel_id, mut vessel_events) in by_vessel {
            if vessel_events.len() < 2 {
                counts.single_observation_vessels += 1;
                counts.single_observation_events += vessel_events.len();
                debug!(vessel_id, "单条观测船舶,不产生停靠");
                continue;
            }

            vessel_events.sort_by_key(|e| e.timestamp);
            let before = visits.len();
            fold_runs(&vessel_events, &mut visits);
            counts.events_collapsed += vessel_events.len() - (visits.len() - before);
        }

        counts.visits_out = visits.len();
        info!(
            vessels = counts.vessels,
            single_observation_vessels = counts.single_observation_vessels,
            events_collapsed = counts.events_collapsed,
            visits_out = counts.visits_out,
            "连续观测折叠完成"
        );
        (visits, counts)
    }
}

impl Default for RunCollapser {
    fn default() -> Self {
        Self::new()
    }
}

/// 单船已排序事件 → 停靠序列; 港口变化即开启新停靠
fn fold_runs(sorted: &[Event], out: &mut Vec<Visit>) {
    let mut open: Option<Visit> = None;

    for event in sorted {
        let same_port = open.as_ref().is_some_and(|v| v.port_id == event.port_id);
        if same_port {
            if let Some(visit) = open.as_mut() {
                visit.last_timestamp = event.timestamp;
                visit.last_draft = event.draft;
                visit.observations += 1;
                if visit.imo.is_none() {
                    visit.imo = event.imo;
                }
            }
        } else if let Some(done) = open.replace(start_visit(event)) {
            out.push(done);
        }
    }

    if let Some(done) = open {
        out.push(done);
    }
}

fn start_visit(event: &Event) -> Visit {
    Visit {
        vessel_id: event.vessel_id,
        imo: event.imo,
        port_id: event.port_id,
        first_timestamp: event.timestamp,
        last_timestamp: event.timestamp,
        first_draft: event.draft,
        last_draft: event.draft,
        observations: 1,
    }
}
