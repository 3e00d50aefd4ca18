// ==========================================
// 港口通航压力指数系统 - 流水线编排器
// ==========================================
// 用途: 协调六个阶段的执行顺序
// 流程: 规范化 → 折叠 → 航段重建 → 航线汇总 → 基准时长 → 压力计算
// 红线: 任一阶段致命错误 → 整体失败,不返回部分结果
//       每个阶段边界的过滤/丢弃/标记计数写入运行报告
// ==========================================

use crate::config::{PipelineConfig, TrafficClassifier};
use crate::domain::event::Event;
use crate::domain::lane::{LaneActivity, LaneBucketStats, LaneKey, LaneProfile, ReferenceLeadTime};
use crate::domain::port::{PortMeta, PortTable};
use crate::domain::quality::{DqLevel, DqViolation, PipelineReport};
use crate::domain::stress::StressOutput;
use crate::domain::types::{Granularity, TrafficFilter};
use crate::domain::vessel::VesselTable;
use crate::domain::voyage::Leg;
use crate::engine::error::{PipelineError, PipelineResult};
use crate::engine::{
    EventNormalizer, LaneAggregator, LegReconstructor, ReferenceEstimator, RunCollapser,
    StressCalculator,
};
use crate::perf::StageGuard;
use std::collections::BTreeMap;
use tracing::{info, warn};
use uuid::Uuid;

// ==========================================
// PipelineInput - 流水线输入
// ==========================================
#[derive(Debug, Clone)]
pub struct PipelineInput {
    pub events: Vec<Event>,
    pub ports: Vec<PortMeta>,
    pub traffic_filter: TrafficFilter,
    /// 导入阶段产生的 DQ 违规（并入运行报告）
    pub violations: Vec<DqViolation>,
}

impl PipelineInput {
    pub fn new(events: Vec<Event>, ports: Vec<PortMeta>) -> Self {
        Self {
            events,
            ports,
            traffic_filter: TrafficFilter::All,
            violations: Vec::new(),
        }
    }

    pub fn with_traffic_filter(mut self, filter: TrafficFilter) -> Self {
        self.traffic_filter = filter;
        self
    }

    pub fn with_violations(mut self, violations: Vec<DqViolation>) -> Self {
        self.violations = violations;
        self
    }
}

// ==========================================
// PipelineOutput - 流水线结果
// ==========================================
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub report: PipelineReport,
    pub legs: Vec<Leg>,
    pub quarantined_legs: Vec<Leg>,
    pub lane_months: Vec<LaneBucketStats>,
    pub lane_weeks: Vec<LaneBucketStats>,
    pub lane_activity: BTreeMap<LaneKey, LaneActivity>,
    pub references: BTreeMap<LaneKey, ReferenceLeadTime>,
    pub stress: StressOutput,
}

// ==========================================
// StressPipeline - 流水线编排器
// ==========================================
pub struct StressPipeline {
    config: PipelineConfig,
    classifier: TrafficClassifier,
}

impl StressPipeline {
    /// 创建编排器（配置非法时失败）
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        let classifier = config.classifier()?;
        Ok(Self { config, classifier })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 构建港口维表并按 port_id 应用修正表
    pub fn build_port_table(&self, ports: Vec<PortMeta>) -> PortTable {
        let mut table = PortTable::from_records(ports);
        let unmatched = table.apply_overrides(&self.config.port_overrides);
        if !unmatched.is_empty() {
            warn!(unmatched = ?unmatched, "港口修正项未匹配到港口");
        }
        table
    }

    /// 执行完整流程
    pub fn run(&self, input: PipelineInput) -> PipelineResult<PipelineOutput> {
        let run_id = Uuid::new_v4().to_string();
        let mut report = PipelineReport::new(run_id.clone(), input.traffic_filter);
        report.violations = input.violations;

        info!(
            run_id = %run_id,
            events = input.events.len(),
            ports = input.ports.len(),
            filter = %input.traffic_filter,
            "开始执行压力指数流水线"
        );

        // 维表在通航类型过滤之前构建
        let ports = self.build_port_table(input.ports);
        let vessels = VesselTable::from_events(&input.events);

        // ==========================================
        // 步骤1: 事件规范化
        // ==========================================
        let guard = StageGuard::new("normalize");
        let (departures, normalize_counts) =
            EventNormalizer::new(&self.classifier).normalize(input.events, input.traffic_filter);
        report.normalize = normalize_counts;
        report.stage_elapsed_ms.push((guard.stage().to_string(), guard.finish()));

        // ==========================================
        // 步骤2: 连续观测折叠
        // ==========================================
        let guard = StageGuard::new("collapse");
        let (visits, collapse_counts) = RunCollapser::new().collapse(departures);
        report.collapse = collapse_counts;
        report.stage_elapsed_ms.push((guard.stage().to_string(), guard.finish()));

        // ==========================================
        // 步骤3: 航段重建
        // ==========================================
        let guard = StageGuard::new("legs");
        let outcome = LegReconstructor::new(&ports, &vessels, &self.classifier)
            .fail_on_negative_elapsed(self.config.fail_on_negative_elapsed)
            .reconstruct(visits)?;
        report.legs = outcome.counts;
        for leg in &outcome.quarantined {
            report.violations.push(DqViolation {
                row_number: 0,
                vessel_id: Some(leg.vessel_id),
                level: DqLevel::Warning,
                field: "elapsed_hours".to_string(),
                message: format!(
                    "航段 {}->{} 时长为负 ({:.3} 小时),已隔离",
                    leg.origin_port_id, leg.destination_port_id, leg.elapsed_hours
                ),
            });
        }
        report.stage_elapsed_ms.push((guard.stage().to_string(), guard.finish()));

        // ==========================================
        // 步骤4: 航线汇总（月 + 周）
        // ==========================================
        let guard = StageGuard::new("lanes");
        let lane_months = LaneAggregator::aggregate(&outcome.legs, Granularity::Monthly, &ports);
        let lane_weeks = LaneAggregator::aggregate(&outcome.legs, Granularity::Weekly, &ports);
        let lane_activity = LaneAggregator::lane_activity(&lane_months);
        report.lanes = lane_activity.len();
        report.stage_elapsed_ms.push((guard.stage().to_string(), guard.finish()));

        // ==========================================
        // 步骤5: 基准时长估计
        // ==========================================
        let guard = StageGuard::new("reference");
        let references = ReferenceEstimator::new(&self.config).estimate(&outcome.legs, &lane_activity);
        report.references = references.len();
        report.stage_elapsed_ms.push((guard.stage().to_string(), guard.finish()));

        // ==========================================
        // 步骤6: 压力计算
        // ==========================================
        let guard = StageGuard::new("stress");
        let (stress, stress_counts) =
            StressCalculator::new(&self.config).compute(&outcome.legs, &lane_months, &references, &ports);
        report.stress = stress_counts;
        report.stage_elapsed_ms.push((guard.stage().to_string(), guard.finish()));

        info!(
            run_id = %run_id,
            legs = outcome.legs.len(),
            lanes = report.lanes,
            port_months = stress.port_months.len(),
            region_months = stress.region_months.len(),
            "压力指数流水线完成"
        );

        Ok(PipelineOutput {
            report,
            legs: outcome.legs,
            quarantined_legs: outcome.quarantined,
            lane_months,
            lane_weeks,
            lane_activity,
            references,
            stress,
        })
    }

    /// 单航线画像（基于本次运行的月度航线汇总）
    pub fn lane_profile(
        &self,
        output: &PipelineOutput,
        lane: LaneKey,
    ) -> PipelineResult<LaneProfile> {
        ReferenceEstimator::new(&self.config)
            .profile_lane(&output.lane_months, lane)
            .ok_or_else(|| PipelineError::LaneNotFound(lane.to_string()))
    }
}
