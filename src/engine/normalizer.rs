// ==========================================
// 港口通航压力指数系统 - 事件规范化
// ==========================================
// 职责: 仅保留离港事件 + 按通航类型过滤
// 说明: 不排序（排序由折叠阶段负责）,保持输入相对顺序
// ==========================================

use crate::config::TrafficClassifier;
use crate::domain::event::Event;
use crate::domain::quality::NormalizeCounts;
use crate::domain::types::{TrafficFilter, TrafficType};
use tracing::{info, instrument};

pub struct EventNormalizer<'a> {
    classifier: &'a TrafficClassifier,
}

impl<'a> EventNormalizer<'a> {
    pub fn new(classifier: &'a TrafficClassifier) -> Self {
        Self { classifier }
    }

    #[instrument(skip(self, events), fields(events = events.len(), filter = %filter))]
    pub fn normalize(
        &self,
        events: Vec<Event>,
        filter: TrafficFilter,
    ) -> (Vec<Event>, NormalizeCounts) {
        let mut counts = NormalizeCounts {
            events_in: events.len(),
            ..Default::default()
        };

        let kept: Vec<Event> = events
            .into_iter()
            .filter(|event| {
                if !event.is_departure() {
                    counts.non_departures_dropped += 1;
                    return false;
                }
                let traffic = self.classifier.classify(event.vessel_class.as_deref());
                if traffic == TrafficType::Unclassified {
                    counts.unclassified_seen += 1;
                }
                if !filter.accepts(traffic) {
                    counts.traffic_mismatch_dropped += 1;
                    return false;
                }
                true
            })
            .collect();

        counts.events_out = kept.len();
        info!(
            events_in = counts.events_in,
            non_departures = counts.non_departures_dropped,
            traffic_mismatch = counts.traffic_mismatch_dropped,
            unclassified = counts.unclassified_seen,
            events_out = counts.events_out,
            "事件规范化完成"
        );
        (kept, counts)
    }
}
