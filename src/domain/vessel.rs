// ==========================================
// 港口通航压力指数系统 - 船舶元数据
// ==========================================
// 职责: 由事件表派生船舶维表（按船舶 ID 汇总）
// 口径: IMO/船名/船型取首个非空值, 尺度类取最大值
// ==========================================

use crate::domain::event::Event;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselMeta {
    pub vessel_id: i64,
    pub imo: Option<i64>,
    pub name: Option<String>,
    pub vessel_class: Option<String>,
    pub capacity_teu: Option<f64>,
    pub gross_tonnage: Option<f64>,
    pub dwt: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,
}

impl VesselMeta {
    fn empty(vessel_id: i64) -> Self {
        Self {
            vessel_id,
            imo: None,
            name: None,
            vessel_class: None,
            capacity_teu: None,
            gross_tonnage: None,
            dwt: None,
            length: None,
            width: None,
        }
    }

    fn absorb(&mut self, event: &Event) {
        if self.imo.is_none() {
            self.imo = event.imo;
        }
        if self.name.is_none() {
            self.name = event.vessel_name.clone();
        }
        if self.vessel_class.is_none() {
            self.vessel_class = event.vessel_class.clone();
        }
        self.capacity_teu = max_opt(self.capacity_teu, event.capacity_teu);
        self.gross_tonnage = max_opt(self.gross_tonnage, event.gross_tonnage);
        self.dwt = max_opt(self.dwt, event.dwt);
        self.length = max_opt(self.length, event.length);
        self.width = max_opt(self.width, event.width);
    }
}

fn max_opt(current: Option<f64>, candidate: Option<f64>) -> Option<f64> {
    match (current, candidate) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (None, b) => b,
        (a, None) => a,
    }
}

// ==========================================
// VesselTable - 船舶维表（只读共享）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct VesselTable {
    vessels: BTreeMap<i64, VesselMeta>,
}

impl VesselTable {
    /// 从完整事件表派生（应在通航类型过滤之前调用）
    pub fn from_events(events: &[Event]) -> Self {
        let mut vessels: BTreeMap<i64, VesselMeta> = BTreeMap::new();
        for event in events {
            vessels
                .entry(event.vessel_id)
                .or_insert_with(|| VesselMeta::empty(event.vessel_id))
                .absorb(event);
        }
        Self { vessels }
    }

    pub fn get(&self, vessel_id: i64) -> Option<&VesselMeta> {
        self.vessels.get(&vessel_id)
    }

    pub fn len(&self) -> usize {
        self.vessels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vessels.is_empty()
    }
}
