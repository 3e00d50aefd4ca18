// ==========================================
// 港口通航压力指数系统 - 核心库
// ==========================================
// 输入: 船舶港口事件表 + 港口元数据表
// 输出: 重建航段 / 航线汇总 / 港口-月与海区-月压力指标
// 运行方式: 单线程批处理（有界历史窗口）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 六阶段分析流水线
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 经验常量与修正表
pub mod config;

// 导出层 - CSV/JSON
pub mod export;

// 日志系统
pub mod logging;

// 阶段耗时
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ActivityBasis, DelayBasis, Granularity, MoveType, TimeBucket, TrafficFilter, TrafficType,
};

// 领域实体
pub use domain::{
    Event, LaneBucketStats, LaneKey, Leg, PipelineReport, PortMeta, PortOverride, PortTable,
    PortStressRecord, ReferenceLeadTime, RegionStressRecord, StressOutput, VesselTable, Visit,
};

// 引擎
pub use engine::{
    EventNormalizer, LaneAggregator, LegReconstructor, PipelineError, PipelineInput,
    PipelineOutput, PipelineResult, ReferenceEstimator, RunCollapser, StressCalculator,
    StressPipeline,
};

// 配置
pub use config::PipelineConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "港口通航压力指数系统";
