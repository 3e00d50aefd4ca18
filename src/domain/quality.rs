// ==========================================
// 港口通航压力指数系统 - 数据质量与阶段计数
// ==========================================
// 职责: 各阶段边界的过滤/丢弃/标记计数 + DQ 违规明细
// 红线: 任何行级丢弃都必须有对应计数
// ==========================================

use crate::domain::types::TrafficFilter;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    Warning, // 警告（继续运行）
    Info,    // 提示（仅记录）
}

// ==========================================
// DqViolation - 数据质量违规记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize,
    pub vessel_id: Option<i64>,
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}

// ==========================================
// 阶段计数
// ==========================================

/// 事件规范化阶段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeCounts {
    pub events_in: usize,
    pub non_departures_dropped: usize,
    pub traffic_mismatch_dropped: usize,
    pub unclassified_seen: usize, // 船型未命中映射的离港事件数
    pub events_out: usize,
}

/// 连续观测折叠阶段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapseCounts {
    pub events_in: usize,
    pub vessels: usize,
    pub single_observation_vessels: usize, // 仅一条离港观测的船舶（不产生停靠）
    pub single_observation_events: usize,
    pub events_collapsed: usize, // 被并入已有停靠的重复观测
    pub visits_out: usize,
}

/// 航段重建阶段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegCounts {
    pub visits_in: usize,
    pub without_predecessor: usize, // 各船窗口内首个停靠
    pub same_port_pairs: usize,
    pub negative_elapsed: usize,
    pub unknown_origin_port: usize,
    pub unknown_destination_port: usize,
    pub unknown_vessel: usize,
    pub unclassified_traffic: usize,
    pub legs_out: usize,
}

/// 压力计算阶段
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StressCounts {
    pub units_in: usize,
    pub missing_reference: usize,   // 无基准时长（不视为零延误）
    pub insufficient_sample: usize, // 航线活跃度 <= 阈值
    pub invalid_capacity: usize,    // 运力缺失或 <= 0
    pub units_used: usize,
    pub delayed_units: usize,
    pub ports_without_region: usize,
}

// ==========================================
// PipelineReport - 全流程汇总报告
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub run_id: String,
    pub traffic_filter: TrafficFilter,
    pub normalize: NormalizeCounts,
    pub collapse: CollapseCounts,
    pub legs: LegCounts,
    pub lanes: usize,
    pub references: usize,
    pub stress: StressCounts,
    pub violations: Vec<DqViolation>,
    pub stage_elapsed_ms: Vec<(String, u64)>,
}

impl PipelineReport {
    pub fn new(run_id: String, traffic_filter: TrafficFilter) -> Self {
        Self {
            run_id,
            traffic_filter,
            normalize: NormalizeCounts::default(),
            collapse: CollapseCounts::default(),
            legs: LegCounts::default(),
            lanes: 0,
            references: 0,
            stress: StressCounts::default(),
            violations: Vec::new(),
            stage_elapsed_ms: Vec::new(),
        }
    }

    pub fn count_level(&self, level: DqLevel) -> usize {
        self.violations.iter().filter(|v| v.level == level).count()
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "运行 {} (通航类型: {})", self.run_id, self.traffic_filter)?;
        writeln!(
            f,
            "  [规范化] 输入 {} / 非离港丢弃 {} / 类型不符丢弃 {} / 未分类 {} / 输出 {}",
            self.normalize.events_in,
            self.normalize.non_departures_dropped,
            self.normalize.traffic_mismatch_dropped,
            self.normalize.unclassified_seen,
            self.normalize.events_out
        )?;
        writeln!(
            f,
            "  [折叠] 输入 {} / 船舶 {} / 单观测船舶 {} (事件 {}) / 并入 {} / 停靠 {}",
            self.collapse.events_in,
            self.collapse.vessels,
            self.collapse.single_observation_vessels,
            self.collapse.single_observation_events,
            self.collapse.events_collapsed,
            self.collapse.visits_out
        )?;
        writeln!(
            f,
            "  [航段] 输入 {} / 无前序 {} / 同港 {} / 负时长 {} / 未知起运港 {} / 未知目的港 {} / 未知船舶 {} / 输出 {}",
            self.legs.visits_in,
            self.legs.without_predecessor,
            self.legs.same_port_pairs,
            self.legs.negative_elapsed,
            self.legs.unknown_origin_port,
            self.legs.unknown_destination_port,
            self.legs.unknown_vessel,
            self.legs.legs_out
        )?;
        writeln!(f, "  [航线] 航线 {} / 基准时长 {}", self.lanes, self.references)?;
        writeln!(
            f,
            "  [压力] 单元 {} / 无基准 {} / 样本不足 {} / 运力无效 {} / 使用 {} / 延误 {} / 无海区港口 {}",
            self.stress.units_in,
            self.stress.missing_reference,
            self.stress.insufficient_sample,
            self.stress.invalid_capacity,
            self.stress.units_used,
            self.stress.delayed_units,
            self.stress.ports_without_region
        )?;
        write!(
            f,
            "  [DQ] 警告 {} / 提示 {}",
            self.count_level(DqLevel::Warning),
            self.count_level(DqLevel::Info)
        )
    }
}
