// ==========================================
// 港口通航压力指数系统 - 引擎层
// ==========================================
// 职责: 事件 → 停靠 → 航段 → 航线 → 基准时长 → 压力指标
// 红线: 引擎不做文件读写; 每个阶段完整替换自身输出集合
// ==========================================

pub mod error;
pub mod lane_aggregator;
pub mod leg_builder;
pub mod normalizer;
pub mod orchestrator;
pub mod reference;
pub mod run_collapser;
pub mod stress;

// 重导出核心引擎
pub use error::{PipelineError, PipelineResult};
pub use lane_aggregator::LaneAggregator;
pub use leg_builder::{LegOutcome, LegReconstructor};
pub use normalizer::EventNormalizer;
pub use orchestrator::{PipelineInput, PipelineOutput, StressPipeline};
pub use reference::{median, quantile, ReferenceEstimator};
pub use run_collapser::RunCollapser;
pub use stress::StressCalculator;
