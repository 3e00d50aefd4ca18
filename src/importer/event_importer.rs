// ==========================================
// 港口通航压力指数系统 - 事件/港口导入器
// ==========================================
// 流程: 解析 → 映射 → DQ 校验 → 返回批次
// 红线: 任一行结构性缺陷 → 整批失败（不产出部分结果）
// ==========================================

use crate::domain::event::Event;
use crate::domain::port::PortMeta;
use crate::domain::quality::DqViolation;
use crate::importer::dq_validator::DqValidator;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::file_parser::UniversalFileParser;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

// ==========================================
// EventBatch - 一次导入的事件批次
// ==========================================
#[derive(Debug, Clone)]
pub struct EventBatch {
    pub rows_read: usize,
    pub events: Vec<Event>,
    pub violations: Vec<DqViolation>,
}

// ==========================================
// EventImporter - 港口事件导入器
// ==========================================
pub struct EventImporter {
    file_parser: UniversalFileParser,
    field_mapper: FieldMapper,
    dq_validator: DqValidator,
}

impl EventImporter {
    pub fn new() -> Self {
        Self::with_csv_delimiter(b',')
    }

    pub fn with_csv_delimiter(delimiter: u8) -> Self {
        Self {
            file_parser: UniversalFileParser::with_csv_delimiter(delimiter),
            field_mapper: FieldMapper::new(),
            dq_validator: DqValidator::new(),
        }
    }

    #[instrument(skip_all)]
    pub fn import<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<EventBatch> {
        let path = file_path.as_ref();
        let rows = self.file_parser.parse(path)?;
        let rows_read = rows.len();
        info!(file = %path.display(), rows = rows_read, "事件文件解析完成");

        let events = rows
            .iter()
            .map(|(row_number, row)| self.field_mapper.map_to_event(row, *row_number))
            .collect::<ImportResult<Vec<_>>>()?;
        debug!(events = events.len(), "字段映射完成");

        let violations = self.dq_validator.validate(&events);
        if !violations.is_empty() {
            warn!(count = violations.len(), "事件数据存在 DQ 违规");
        }

        info!(events = events.len(), violations = violations.len(), "事件导入完成");
        Ok(EventBatch {
            rows_read,
            events,
            violations,
        })
    }
}

impl Default for EventImporter {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// PortImporter - 港口维表导入器
// ==========================================
pub struct PortImporter {
    file_parser: UniversalFileParser,
    field_mapper: FieldMapper,
}

impl PortImporter {
    pub fn new() -> Self {
        Self::with_csv_delimiter(b',')
    }

    pub fn with_csv_delimiter(delimiter: u8) -> Self {
        Self {
            file_parser: UniversalFileParser::with_csv_delimiter(delimiter),
            field_mapper: FieldMapper::new(),
        }
    }

    #[instrument(skip_all)]
    pub fn import<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Vec<PortMeta>> {
        let path = file_path.as_ref();
        let rows = self.file_parser.parse(path)?;
        debug!(file = %path.display(), rows = rows.len(), "港口文件解析完成");

        let ports = rows
            .iter()
            .map(|(row_number, row)| self.field_mapper.map_to_port(row, *row_number))
            .collect::<ImportResult<Vec<_>>>()?;

        info!(ports = ports.len(), "港口维表导入完成");
        Ok(ports)
    }
}

impl Default for PortImporter {
    fn default() -> Self {
        Self::new()
    }
}
