// ==========================================
// 港口通航压力指数系统 - 配置层
// ==========================================
// 职责: 流水线常量（可覆写）、船型分类表、港口修正表
// 存储: 可选 JSON 文件,缺省项取内置默认值
// ==========================================

pub mod error;
pub mod pipeline_config;
pub mod traffic_classes;

// 重导出核心配置
pub use error::{ConfigError, ConfigResult};
pub use pipeline_config::{config_keys, PipelineConfig};
pub use traffic_classes::{TrafficClasses, TrafficClassifier};
