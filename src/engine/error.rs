// ==========================================
// 港口通航压力指数系统 - 引擎错误类型
// ==========================================
// 说明: 数值/统计边界情况在阶段内处理并计数,不在此列
//       此处仅列出会终止整次运行的致命错误
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("航段时长为负 (船舶 {vessel_id}, {origin}->{destination}): {elapsed_hours:.3} 小时")]
    NegativeElapsed {
        vessel_id: i64,
        origin: i64,
        destination: i64,
        elapsed_hours: f64,
    },

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("航线不存在: {0}")]
    LaneNotFound(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
