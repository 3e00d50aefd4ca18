// ==========================================
// 港口通航压力指数系统 - 领域模型层
// ==========================================
// 职责: 定义事件、停靠、航段、航线与压力记录等领域实体
// 红线: 不含文件读写逻辑,不含引擎逻辑
// ==========================================

pub mod event;
pub mod lane;
pub mod port;
pub mod quality;
pub mod stress;
pub mod types;
pub mod vessel;
pub mod voyage;

// 重导出核心类型
pub use event::Event;
pub use lane::{LaneActivity, LaneBucketStats, LaneKey, LaneProfile, ReferenceLeadTime};
pub use port::{OverrideField, PortMeta, PortOverride, PortTable};
pub use quality::{
    CollapseCounts, DqLevel, DqViolation, LegCounts, NormalizeCounts, PipelineReport,
    StressCounts,
};
pub use stress::{MonthlyStressTotal, PortStressRecord, RegionStressRecord, StressOutput};
pub use types::{
    ActivityBasis, DelayBasis, Granularity, MoveType, TimeBucket, TrafficFilter, TrafficType,
    UNKNOWN,
};
pub use vessel::{VesselMeta, VesselTable};
pub use voyage::{Leg, Visit};
