// ==========================================
// 港口通航压力指数系统 - 港口元数据
// ==========================================
// 职责: 港口维表 + 按港口 ID 的显式修正表
// 红线: 修正只按 port_id 匹配,不依赖行位置
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortMeta {
    pub port_id: i64,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub un_code: Option<String>,      // UN/LOCODE
    pub country_iso3: Option<String>, // ISO-3 国家代码
    pub economy: Option<String>,      // 经济体名称
    pub maritime_region: Option<String>,
}

impl PortMeta {
    pub fn new(port_id: i64) -> Self {
        Self {
            port_id,
            name: None,
            latitude: None,
            longitude: None,
            un_code: None,
            country_iso3: None,
            economy: None,
            maritime_region: None,
        }
    }
}

// ==========================================
// 港口修正项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideField {
    Name,
    CountryIso3,
    Economy,
    MaritimeRegion,
}

impl fmt::Display for OverrideField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideField::Name => write!(f, "name"),
            OverrideField::CountryIso3 => write!(f, "country_iso3"),
            OverrideField::Economy => write!(f, "economy"),
            OverrideField::MaritimeRegion => write!(f, "maritime_region"),
        }
    }
}

/// 单条修正: (port_id → 字段 → 修正值)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortOverride {
    pub port_id: i64,
    pub field: OverrideField,
    pub value: String,
}

// ==========================================
// PortTable - 港口维表（只读共享）
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct PortTable {
    ports: BTreeMap<i64, PortMeta>,
}

impl PortTable {
    /// 构建港口维表; 重复 port_id 以首条为准
    pub fn from_records(records: Vec<PortMeta>) -> Self {
        let mut ports = BTreeMap::new();
        let mut duplicates = 0usize;
        for record in records {
            if ports.contains_key(&record.port_id) {
                duplicates += 1;
                continue;
            }
            ports.insert(record.port_id, record);
        }
        if duplicates > 0 {
            warn!(duplicates, "港口维表存在重复 port_id,已保留首条");
        }
        Self { ports }
    }

    /// 应用修正表,返回未命中的 port_id 列表
    pub fn apply_overrides(&mut self, overrides: &[PortOverride]) -> Vec<i64> {
        let mut unmatched = Vec::new();
        let mut applied = 0usize;

        for item in overrides {
            let Some(port) = self.ports.get_mut(&item.port_id) else {
                unmatched.push(item.port_id);
                continue;
            };
            let value = Some(item.value.clone());
            match item.field {
                OverrideField::Name => port.name = value,
                OverrideField::CountryIso3 => port.country_iso3 = value,
                OverrideField::Economy => port.economy = value,
                OverrideField::MaritimeRegion => port.maritime_region = value,
            }
            applied += 1;
        }

        info!(applied, unmatched = unmatched.len(), "港口修正表已应用");
        unmatched
    }

    pub fn get(&self, port_id: i64) -> Option<&PortMeta> {
        self.ports.get(&port_id)
    }

    pub fn region_of(&self, port_id: i64) -> Option<&str> {
        self.get(port_id).and_then(|p| p.maritime_region.as_deref())
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}
