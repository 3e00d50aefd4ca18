// ==========================================
// 港口通航压力指数系统 - 数据质量校验器实现
// ==========================================
// 职责: 事件级 DQ 校验（重复观测 / 异常吃水 / 运力缺失）
// 说明: DQ 违规只记录,不修改也不丢弃事件
// ==========================================

use crate::domain::event::Event;
use crate::domain::quality::{DqLevel, DqViolation};
use chrono::NaiveDateTime;
use std::collections::HashSet;

pub struct DqValidator;

impl DqValidator {
    pub fn new() -> Self {
        Self
    }

    /// 批量校验
    pub fn validate(&self, events: &[Event]) -> Vec<DqViolation> {
        let mut violations = self.validate_duplicates(events);
        for event in events {
            violations.extend(self.validate_event(event));
        }
        violations
    }

    /// 同批次内完全重复的观测（船舶 + IMO + 时间 + 港口 + 动作）
    pub fn validate_duplicates(&self, events: &[Event]) -> Vec<DqViolation> {
        let mut seen: HashSet<(i64, Option<i64>, NaiveDateTime, i64, String)> = HashSet::new();
        let mut violations = Vec::new();

        for event in events {
            let key = (
                event.vessel_id,
                event.imo,
                event.timestamp,
                event.port_id,
                event.move_type.to_string(),
            );
            if !seen.insert(key) {
                violations.push(DqViolation {
                    row_number: event.row_number,
                    vessel_id: Some(event.vessel_id),
                    level: DqLevel::Warning,
                    field: "timestamp".to_string(),
                    message: format!(
                        "重复观测: 港口 {} @ {}",
                        event.port_id, event.timestamp
                    ),
                });
            }
        }

        violations
    }

    /// 单条事件校验
    pub fn validate_event(&self, event: &Event) -> Vec<DqViolation> {
        let mut violations = Vec::new();

        if let Some(draft) = event.draft {
            if draft < 0.0 {
                violations.push(DqViolation {
                    row_number: event.row_number,
                    vessel_id: Some(event.vessel_id),
                    level: DqLevel::Warning,
                    field: "draft".to_string(),
                    message: format!("吃水为负: {}", draft),
                });
            }
        }

        match event.capacity_teu {
            Some(teu) if teu <= 0.0 => violations.push(DqViolation {
                row_number: event.row_number,
                vessel_id: Some(event.vessel_id),
                level: DqLevel::Info,
                field: "capacity_teu".to_string(),
                message: format!("运力非正: {}", teu),
            }),
            _ => {}
        }

        violations
    }
}

impl Default for DqValidator {
    fn default() -> Self {
        Self::new()
    }
}
