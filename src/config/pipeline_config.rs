// ==========================================
// 港口通航压力指数系统 - 流水线配置
// ==========================================
// 职责: 经验常量具名化（可覆写）+ JSON 加载 + 校验
// 说明: 730 小时/月 与 k=2 均为经验取值,保持可配置
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::traffic_classes::{TrafficClasses, TrafficClassifier};
use crate::domain::port::PortOverride;
use crate::domain::types::{ActivityBasis, DelayBasis};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

// ==========================================
// 配置键（用于错误提示与文档）
// ==========================================
pub mod config_keys {
    pub const REFERENCE_K: &str = "reference_k";
    pub const MEDIAN_QUANTILE: &str = "median_quantile";
    pub const LOW_QUANTILE: &str = "low_quantile";
    pub const HOURS_PER_MONTH: &str = "hours_per_month";
    pub const MIN_LANE_ACTIVITY: &str = "min_lane_activity";
    pub const ACTIVITY_BASIS: &str = "activity_basis";
    pub const DELAY_BASIS: &str = "delay_basis";
    pub const FAIL_ON_NEGATIVE_ELAPSED: &str = "fail_on_negative_elapsed";
    pub const TRAFFIC_CLASSES: &str = "traffic_classes";
    pub const PORT_OVERRIDES: &str = "port_overrides";
}

pub const DEFAULT_REFERENCE_K: f64 = 2.0;
pub const DEFAULT_MEDIAN_QUANTILE: f64 = 0.5;
pub const DEFAULT_LOW_QUANTILE: f64 = 0.1;
pub const DEFAULT_HOURS_PER_MONTH: f64 = 730.0;
pub const DEFAULT_MIN_LANE_ACTIVITY: usize = 10;

fn default_reference_k() -> f64 {
    DEFAULT_REFERENCE_K
}

fn default_median_quantile() -> f64 {
    DEFAULT_MEDIAN_QUANTILE
}

fn default_low_quantile() -> f64 {
    DEFAULT_LOW_QUANTILE
}

fn default_hours_per_month() -> f64 {
    DEFAULT_HOURS_PER_MONTH
}

fn default_min_lane_activity() -> usize {
    DEFAULT_MIN_LANE_ACTIVITY
}

// ==========================================
// PipelineConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 基准时长外推系数: reference = (k+1) * Q(median) - k * Q(low)
    #[serde(default = "default_reference_k")]
    pub reference_k: f64,

    #[serde(default = "default_median_quantile")]
    pub median_quantile: f64,

    #[serde(default = "default_low_quantile")]
    pub low_quantile: f64,

    /// 月均小时数（延误折算常量）
    #[serde(default = "default_hours_per_month")]
    pub hours_per_month: f64,

    /// 航线活跃度阈值（严格大于才参与压力计算）
    #[serde(default = "default_min_lane_activity")]
    pub min_lane_activity: usize,

    #[serde(default)]
    pub activity_basis: ActivityBasis,

    #[serde(default)]
    pub delay_basis: DelayBasis,

    /// 出现负时长航段时是否终止运行
    #[serde(default)]
    pub fail_on_negative_elapsed: bool,

    #[serde(default)]
    pub traffic_classes: TrafficClasses,

    #[serde(default)]
    pub port_overrides: Vec<PortOverride>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            reference_k: DEFAULT_REFERENCE_K,
            median_quantile: DEFAULT_MEDIAN_QUANTILE,
            low_quantile: DEFAULT_LOW_QUANTILE,
            hours_per_month: DEFAULT_HOURS_PER_MONTH,
            min_lane_activity: DEFAULT_MIN_LANE_ACTIVITY,
            activity_basis: ActivityBasis::default(),
            delay_basis: DelayBasis::default(),
            fail_on_negative_elapsed: false,
            traffic_classes: TrafficClasses::default(),
            port_overrides: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// 从 JSON 文件加载（缺省字段取默认值）并校验
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            overrides = config.port_overrides.len(),
            "配置文件已加载"
        );
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: PipelineConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置取值范围
    pub fn validate(&self) -> ConfigResult<()> {
        check(
            config_keys::REFERENCE_K,
            self.reference_k,
            self.reference_k.is_finite() && self.reference_k >= 0.0,
            "必须为非负有限数",
        )?;
        check(
            config_keys::MEDIAN_QUANTILE,
            self.median_quantile,
            (0.0..=1.0).contains(&self.median_quantile),
            "分位数必须位于 [0, 1]",
        )?;
        check(
            config_keys::LOW_QUANTILE,
            self.low_quantile,
            (0.0..=1.0).contains(&self.low_quantile),
            "分位数必须位于 [0, 1]",
        )?;
        check(
            config_keys::LOW_QUANTILE,
            self.low_quantile,
            self.low_quantile <= self.median_quantile,
            "低分位数不能大于中位分位数",
        )?;
        check(
            config_keys::HOURS_PER_MONTH,
            self.hours_per_month,
            self.hours_per_month.is_finite() && self.hours_per_month > 0.0,
            "必须为正数",
        )?;
        self.classifier().map(|_| ())
    }

    pub fn classifier(&self) -> ConfigResult<TrafficClassifier> {
        TrafficClassifier::new(&self.traffic_classes)
    }
}

fn check(key: &str, value: f64, ok: bool, message: &str) -> ConfigResult<()> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            message: message.to_string(),
        })
    }
}
