// ==========================================
// 港口通航压力指数系统 - 停靠与航段
// ==========================================
// Visit: 同一船舶连续同港离港观测折叠后的一次停靠
// Leg:   同一船舶相邻两次停靠构成的有向航段
// ==========================================

use crate::domain::lane::LaneKey;
use crate::domain::port::PortMeta;
use crate::domain::types::{Granularity, TimeBucket, TrafficType};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Visit - 停靠（折叠结果）
// ==========================================
// 不变量: 同一船舶时间相邻的两个 Visit 港口不同
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub vessel_id: i64,
    pub imo: Option<i64>,
    pub port_id: i64,
    pub first_timestamp: NaiveDateTime,
    pub last_timestamp: NaiveDateTime,
    pub first_draft: Option<f64>,
    pub last_draft: Option<f64>,
    pub observations: usize, // 折叠的观测条数
}

// ==========================================
// Leg - 航段（起运港 → 目的港）
// ==========================================
// 不变量: origin_port_id != destination_port_id, elapsed_hours >= 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    // ===== 航段主体 =====
    pub vessel_id: i64,
    pub imo: Option<i64>,
    pub origin_port_id: i64,
    pub destination_port_id: i64,
    pub origin_departure: NaiveDateTime,      // 起运港最后一次离港
    pub destination_departure: NaiveDateTime, // 目的港最后一次离港（到港代理）
    pub elapsed_hours: f64,

    // ===== 船舶属性（左连接,可能缺失） =====
    pub vessel_class: Option<String>,
    pub capacity_teu: Option<f64>,
    pub gross_tonnage: Option<f64>,
    pub traffic_type: TrafficType,

    // ===== 港口属性（左连接,可能缺失） =====
    pub origin: Option<PortMeta>,
    pub destination: Option<PortMeta>,
}

impl Leg {
    pub fn lane(&self) -> LaneKey {
        LaneKey::new(self.origin_port_id, self.destination_port_id)
    }

    /// 时间桶按目的港离港时间计算
    pub fn bucket(&self, granularity: Granularity) -> TimeBucket {
        TimeBucket::of(self.destination_departure, granularity)
    }

    pub fn month(&self) -> TimeBucket {
        TimeBucket::month_of(self.destination_departure)
    }
}
