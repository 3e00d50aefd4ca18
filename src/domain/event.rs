// ==========================================
// 港口通航压力指数系统 - 船舶港口事件
// ==========================================
// 职责: 单条船舶在港口的位置/进出港观测记录（外部提供,只读）
// ==========================================

use crate::domain::types::MoveType;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// Event - 港口事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    // ===== 主键相关 =====
    pub vessel_id: i64,       // 船舶 ID（SHIP_ID）
    pub imo: Option<i64>,     // IMO 编号
    pub port_id: i64,         // 港口 ID
    pub move_type: MoveType,  // 进港/离港
    pub timestamp: NaiveDateTime, // UTC 时间（去时区）

    // ===== 观测值 =====
    pub draft: Option<f64>, // 吃水（米 x10）

    // ===== 船舶属性（随事件携带） =====
    pub vessel_class: Option<String>, // 船型分类（SHIP_CLASS_NAME）
    pub vessel_name: Option<String>,
    pub capacity_teu: Option<f64>,
    pub gross_tonnage: Option<f64>,
    pub dwt: Option<f64>,
    pub length: Option<f64>,
    pub width: Option<f64>,

    // ===== 元信息 =====
    pub row_number: usize, // 源文件行号（用于 DQ 报告）
}

impl Event {
    /// 最小构造（其余属性为空）
    pub fn new(vessel_id: i64, port_id: i64, move_type: MoveType, timestamp: NaiveDateTime) -> Self {
        Self {
            vessel_id,
            imo: None,
            port_id,
            move_type,
            timestamp,
            draft: None,
            vessel_class: None,
            vessel_name: None,
            capacity_teu: None,
            gross_tonnage: None,
            dwt: None,
            length: None,
            width: None,
            row_number: 0,
        }
    }

    pub fn is_departure(&self) -> bool {
        self.move_type.is_departure()
    }
}
