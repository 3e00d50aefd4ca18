// ==========================================
// 港口通航压力指数系统 - 船型 → 通航类型映射
// ==========================================
// 规则: 固定查表, REGIONAL 与 GLOBAL 两组船型互不相交
//       未命中 → Unclassified（显式哨兵,不丢弃）
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::TrafficType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_regional() -> Vec<String> {
    ["FEEDER", "FEEDERMAX", "HANDYSIZE", "SMALL FEEDER"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_global() -> Vec<String> {
    ["POST PANAMAX", "PANAMAX", "NEW PANAMAX", "ULCV"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// 船型分组（可由配置文件覆写）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficClasses {
    #[serde(default = "default_regional")]
    pub regional: Vec<String>,

    #[serde(default = "default_global")]
    pub global: Vec<String>,
}

impl Default for TrafficClasses {
    fn default() -> Self {
        Self {
            regional: default_regional(),
            global: default_global(),
        }
    }
}

// ==========================================
// TrafficClassifier - 船型分类器
// ==========================================
#[derive(Debug, Clone)]
pub struct TrafficClassifier {
    regional: HashSet<String>,
    global: HashSet<String>,
}

impl TrafficClassifier {
    /// 构建分类器; 两组船型存在交集时报错
    pub fn new(classes: &TrafficClasses) -> ConfigResult<Self> {
        let regional: HashSet<String> = classes.regional.iter().map(|c| normalize(c)).collect();
        let global: HashSet<String> = classes.global.iter().map(|c| normalize(c)).collect();

        if let Some(shared) = regional.intersection(&global).next() {
            return Err(ConfigError::InvalidValue {
                key: "traffic_classes".to_string(),
                value: shared.clone(),
                message: "船型同时出现在 REGIONAL 与 GLOBAL 分组".to_string(),
            });
        }

        Ok(Self { regional, global })
    }

    pub fn classify(&self, vessel_class: Option<&str>) -> TrafficType {
        let Some(class) = vessel_class else {
            return TrafficType::Unclassified;
        };
        let key = normalize(class);
        if self.regional.contains(&key) {
            TrafficType::Regional
        } else if self.global.contains(&key) {
            TrafficType::Global
        } else {
            TrafficType::Unclassified
        }
    }
}

impl Default for TrafficClassifier {
    fn default() -> Self {
        let classes = TrafficClasses::default();
        Self {
            regional: classes.regional.iter().map(|c| normalize(c)).collect(),
            global: classes.global.iter().map(|c| normalize(c)).collect(),
        }
    }
}

fn normalize(class: &str) -> String {
    class.trim().to_uppercase()
}
