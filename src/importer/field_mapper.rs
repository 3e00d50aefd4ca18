// ==========================================
// 港口通航压力指数系统 - 字段映射器实现
// ==========================================
// 职责: 源列名（含别名）→ 领域字段 + 类型转换
// 红线: 必填字段缺失/无法解析 → 致命错误,附行号
// ==========================================

use crate::domain::event::Event;
use crate::domain::port::PortMeta;
use crate::domain::types::MoveType;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::NaiveDateTime;

// ==========================================
// 列名别名表
// ==========================================
mod columns {
    pub const VESSEL_ID: &[&str] = &["SHIP_ID", "vessel_id"];
    pub const IMO: &[&str] = &["IMO", "imo"];
    pub const PORT_ID: &[&str] = &["PORT_ID", "port_id"];
    pub const MOVE_TYPE: &[&str] = &["MOVE_TYPE", "move_type"];
    pub const TIMESTAMP: &[&str] = &["TIMESTAMP_UTC", "timestamp"];
    pub const DRAFT: &[&str] = &["DRAUGHT_METERSX10", "DRAUGHT", "draft"];
    pub const VESSEL_CLASS: &[&str] = &["SHIP_CLASS_NAME", "vessel_class"];
    pub const VESSEL_NAME: &[&str] = &["SHIPNAME", "vessel_name"];
    pub const TEU: &[&str] = &["TEU", "capacity_teu"];
    pub const GROSS_TONNAGE: &[&str] = &["GROSS_TONNAGE", "gross_tonnage"];
    pub const DWT: &[&str] = &["DWT", "dwt"];
    pub const LENGTH: &[&str] = &["LENGTH", "length"];
    pub const WIDTH: &[&str] = &["WIDTH", "width"];

    pub const PORT_NAME: &[&str] = &["PORT_NAME", "name"];
    pub const LATITUDE: &[&str] = &["Latitude", "LATITUDE", "latitude"];
    pub const LONGITUDE: &[&str] = &["Longitude", "LONGITUDE", "longitude"];
    pub const UN_CODE: &[&str] = &["un_code", "UN_CODE", "UNLOCODE"];
    pub const COUNTRY: &[&str] = &["country_3", "COUNTRY_3", "country_iso3"];
    pub const ECONOMY: &[&str] = &["Economy name", "economy"];
    pub const REGION: &[&str] = &["Maritime_Region", "MARITIME_REGION", "maritime_region"];
}

pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 原始行 → Event
    pub fn map_to_event(&self, row: &RawRow, row_number: usize) -> ImportResult<Event> {
        let vessel_id = self.required_id(row, columns::VESSEL_ID, row_number)?;
        let port_id = self.required_id(row, columns::PORT_ID, row_number)?;
        let move_type = MoveType::parse(&self.required(row, columns::MOVE_TYPE, row_number)?);
        let timestamp = self.required_timestamp(row, columns::TIMESTAMP, row_number)?;

        Ok(Event {
            vessel_id,
            imo: self.optional_id(row, columns::IMO, row_number)?,
            port_id,
            move_type,
            timestamp,
            draft: self.optional_f64(row, columns::DRAFT, row_number)?,
            vessel_class: self
                .get_string(row, columns::VESSEL_CLASS)
                .map(|c| self.cleaner.clean_text(&c, true)),
            vessel_name: self.get_string(row, columns::VESSEL_NAME),
            capacity_teu: self.optional_f64(row, columns::TEU, row_number)?,
            gross_tonnage: self.optional_f64(row, columns::GROSS_TONNAGE, row_number)?,
            dwt: self.optional_f64(row, columns::DWT, row_number)?,
            length: self.optional_f64(row, columns::LENGTH, row_number)?,
            width: self.optional_f64(row, columns::WIDTH, row_number)?,
            row_number,
        })
    }

    /// 原始行 → PortMeta
    pub fn map_to_port(&self, row: &RawRow, row_number: usize) -> ImportResult<PortMeta> {
        Ok(PortMeta {
            port_id: self.required_id(row, columns::PORT_ID, row_number)?,
            name: self.get_string(row, columns::PORT_NAME),
            latitude: self.optional_f64(row, columns::LATITUDE, row_number)?,
            longitude: self.optional_f64(row, columns::LONGITUDE, row_number)?,
            un_code: self.get_string(row, columns::UN_CODE),
            country_iso3: self
                .get_string(row, columns::COUNTRY)
                .map(|c| self.cleaner.clean_text(&c, true)),
            economy: self.get_string(row, columns::ECONOMY),
            maritime_region: self.get_string(row, columns::REGION),
        })
    }

    /// 按别名顺序取第一个非空值
    fn get_string(&self, row: &RawRow, aliases: &[&str]) -> Option<String> {
        aliases
            .iter()
            .find_map(|alias| self.cleaner.normalize_null(row.get(*alias).map(|v| v.as_str())))
    }

    fn required(&self, row: &RawRow, aliases: &[&str], row_number: usize) -> ImportResult<String> {
        self.get_string(row, aliases)
            .ok_or_else(|| ImportError::MissingRequiredField {
                row: row_number,
                field: aliases[0].to_string(),
            })
    }

    fn required_id(&self, row: &RawRow, aliases: &[&str], row_number: usize) -> ImportResult<i64> {
        let value = self.required(row, aliases, row_number)?;
        self.cleaner
            .parse_id(&value)
            .ok_or_else(|| ImportError::TypeConversionError {
                row: row_number,
                field: aliases[0].to_string(),
                message: format!("无法解析为整数 ID: {}", value),
            })
    }

    fn required_timestamp(
        &self,
        row: &RawRow,
        aliases: &[&str],
        row_number: usize,
    ) -> ImportResult<NaiveDateTime> {
        let value = self.required(row, aliases, row_number)?;
        self.cleaner
            .parse_timestamp(&value)
            .ok_or_else(|| ImportError::TimestampFormatError {
                row: row_number,
                field: aliases[0].to_string(),
                value,
            })
    }

    fn optional_id(
        &self,
        row: &RawRow,
        aliases: &[&str],
        row_number: usize,
    ) -> ImportResult<Option<i64>> {
        match self.get_string(row, aliases) {
            None => Ok(None),
            Some(value) => self.cleaner.parse_id(&value).map(Some).ok_or_else(|| {
                ImportError::TypeConversionError {
                    row: row_number,
                    field: aliases[0].to_string(),
                    message: format!("无法解析为整数: {}", value),
                }
            }),
        }
    }

    fn optional_f64(
        &self,
        row: &RawRow,
        aliases: &[&str],
        row_number: usize,
    ) -> ImportResult<Option<f64>> {
        match self.get_string(row, aliases) {
            None => Ok(None),
            Some(value) => self.cleaner.parse_decimal(&value).map(Some).ok_or_else(|| {
                ImportError::TypeConversionError {
                    row: row_number,
                    field: aliases[0].to_string(),
                    message: format!("无法解析为浮点数: {}", value),
                }
            }),
        }
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn test_map_event_basic() {
        let raw = row(&[
            ("SHIP_ID", "101"),
            ("IMO", "9300001"),
            ("PORT_ID", "2727.0"),
            ("MOVE_TYPE", "DEPARTURE"),
            ("TIMESTAMP_UTC", "2021-10-01 06:00:00"),
            ("DRAUGHT", "125"),
            ("SHIP_CLASS_NAME", " post panamax "),
            ("TEU", "8500"),
        ]);

        let event = FieldMapper::new().map_to_event(&raw, 2).unwrap();

        assert_eq!(event.vessel_id, 101);
        assert_eq!(event.imo, Some(9300001));
        assert_eq!(event.port_id, 2727);
        assert!(event.is_departure());
        assert_eq!(
            event.timestamp,
            NaiveDate::from_ymd_opt(2021, 10, 1)
                .unwrap()
                .and_hms_opt(6, 0, 0)
                .unwrap()
        );
        assert_eq!(event.draft, Some(125.0));
        assert_eq!(event.vessel_class.as_deref(), Some("POST PANAMAX"));
        assert_eq!(event.capacity_teu, Some(8500.0));
        assert_eq!(event.gross_tonnage, None);
        assert_eq!(event.row_number, 2);
    }

    #[test]
    fn test_map_event_missing_required_is_fatal() {
        let raw = row(&[
            ("SHIP_ID", "101"),
            ("MOVE_TYPE", "DEPARTURE"),
            ("TIMESTAMP_UTC", "2021-10-01 06:00:00"),
        ]);

        let err = FieldMapper::new().map_to_event(&raw, 7).unwrap_err();
        match err {
            ImportError::MissingRequiredField { row, field } => {
                assert_eq!(row, 7);
                assert_eq!(field, "PORT_ID");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_map_event_bad_timestamp() {
        let raw = row(&[
            ("SHIP_ID", "101"),
            ("PORT_ID", "1"),
            ("MOVE_TYPE", "DEPARTURE"),
            ("TIMESTAMP_UTC", "yesterday"),
        ]);

        let result = FieldMapper::new().map_to_event(&raw, 3);
        assert!(matches!(result, Err(ImportError::TimestampFormatError { row: 3, .. })));
    }

    #[test]
    fn test_map_event_invalid_number() {
        let raw = row(&[
            ("SHIP_ID", "101"),
            ("PORT_ID", "1"),
            ("MOVE_TYPE", "DEPARTURE"),
            ("TIMESTAMP_UTC", "2021-10-01 06:00:00"),
            ("TEU", "many"),
        ]);

        assert!(FieldMapper::new().map_to_event(&raw, 2).is_err());
    }

    #[test]
    fn test_map_port_with_nan_region() {
        let raw = row(&[
            ("PORT_ID", "52"),
            ("PORT_NAME", "Tanjung Priok"),
            ("Latitude", "-6.1"),
            ("Longitude", "106.88"),
            ("country_3", "idn"),
            ("Maritime_Region", "nan"),
        ]);

        let port = FieldMapper::new().map_to_port(&raw, 2).unwrap();
        assert_eq!(port.port_id, 52);
        assert_eq!(port.country_iso3.as_deref(), Some("IDN"));
        assert_eq!(port.latitude, Some(-6.1));
        assert_eq!(port.maritime_region, None);
    }
}
