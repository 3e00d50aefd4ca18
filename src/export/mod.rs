// ==========================================
// 港口通航压力指数系统 - CSV 导出
// ==========================================
// 职责: 航段 / 航线汇总 / 基准时长 / 压力指标 → CSV; 运行报告 → JSON
// 口径: 缺失元数据输出为 UNKNOWN; 缺失数值输出为空
// 红线: 先全部写入暂存目录,全部成功后再逐个改名到输出目录
//       任一步失败都清理暂存目录,不留下暂存残留
// ==========================================

pub mod error;

pub use error::{ExportError, ExportResult};

use crate::domain::lane::{LaneActivity, LaneBucketStats, ReferenceLeadTime};
use crate::domain::port::PortMeta;
use crate::domain::quality::PipelineReport;
use crate::domain::stress::{MonthlyStressTotal, PortStressRecord, RegionStressRecord};
use crate::domain::types::UNKNOWN;
use crate::domain::voyage::Leg;
use crate::engine::PipelineOutput;
use csv::Writer;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// 输出文件名
pub const LEGS_FILE: &str = "legs.csv";
pub const LANE_MONTHLY_FILE: &str = "lane_monthly.csv";
pub const LANE_WEEKLY_FILE: &str = "lane_weekly.csv";
pub const LANE_ACTIVITY_FILE: &str = "lane_activity.csv";
pub const REFERENCE_FILE: &str = "lane_reference.csv";
pub const PORT_STRESS_FILE: &str = "port_stress.csv";
pub const REGION_STRESS_FILE: &str = "region_stress.csv";
pub const MONTHLY_STRESS_FILE: &str = "monthly_stress.csv";
pub const REPORT_FILE: &str = "report.json";

const STAGING_DIR: &str = ".staging";

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// ToRow - 表格行转换
// ==========================================
pub trait ToRow {
    const HEADER: &'static [&'static str];
    fn to_row(&self) -> Vec<String>;
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or(UNKNOWN).to_string()
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn port_columns(port: Option<&PortMeta>) -> [String; 5] {
    [
        text(port.and_then(|p| p.name.as_deref())),
        text(port.and_then(|p| p.country_iso3.as_deref())),
        text(port.and_then(|p| p.maritime_region.as_deref())),
        number(port.and_then(|p| p.latitude)),
        number(port.and_then(|p| p.longitude)),
    ]
}

impl ToRow for Leg {
    const HEADER: &'static [&'static str] = &[
        "vessel_id",
        "imo",
        "origin_port_id",
        "destination_port_id",
        "origin_departure",
        "destination_departure",
        "elapsed_hours",
        "vessel_class",
        "capacity_teu",
        "gross_tonnage",
        "traffic_type",
        "origin_name",
        "origin_country",
        "origin_region",
        "origin_latitude",
        "origin_longitude",
        "destination_name",
        "destination_country",
        "destination_region",
        "destination_latitude",
        "destination_longitude",
    ];

    fn to_row(&self) -> Vec<String> {
        let mut row = vec![
            self.vessel_id.to_string(),
            self.imo.map(|i| i.to_string()).unwrap_or_default(),
            self.origin_port_id.to_string(),
            self.destination_port_id.to_string(),
            self.origin_departure.format(TS_FORMAT).to_string(),
            self.destination_departure.format(TS_FORMAT).to_string(),
            self.elapsed_hours.to_string(),
            text(self.vessel_class.as_deref()),
            number(self.capacity_teu),
            number(self.gross_tonnage),
            self.traffic_type.to_string(),
        ];
        row.extend(port_columns(self.origin.as_ref()));
        row.extend(port_columns(self.destination.as_ref()));
        row
    }
}

impl ToRow for LaneBucketStats {
    const HEADER: &'static [&'static str] = &[
        "origin_port_id",
        "destination_port_id",
        "bucket",
        "leg_count",
        "distinct_vessels",
        "capacity_sum",
        "legs_without_capacity",
        "median_elapsed_hours",
        "mean_elapsed_hours",
        "origin_name",
        "origin_country",
        "origin_region",
        "origin_latitude",
        "origin_longitude",
        "destination_name",
        "destination_country",
        "destination_region",
        "destination_latitude",
        "destination_longitude",
    ];

    fn to_row(&self) -> Vec<String> {
        let mut row = vec![
            self.lane.origin.to_string(),
            self.lane.destination.to_string(),
            self.bucket.to_string(),
            self.leg_count.to_string(),
            self.distinct_vessels.to_string(),
            self.capacity_sum.to_string(),
            self.legs_without_capacity.to_string(),
            self.median_elapsed_hours.to_string(),
            self.mean_elapsed_hours.to_string(),
        ];
        row.extend(port_columns(self.origin.as_ref()));
        row.extend(port_columns(self.destination.as_ref()));
        row
    }
}

impl ToRow for LaneActivity {
    const HEADER: &'static [&'static str] = &[
        "origin_port_id",
        "destination_port_id",
        "leg_count",
        "active_periods",
        "distinct_vessels",
        "median_of_bucket_medians",
        "median_bucket_capacity",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.lane.origin.to_string(),
            self.lane.destination.to_string(),
            self.leg_count.to_string(),
            self.active_periods.to_string(),
            self.distinct_vessels.to_string(),
            self.median_of_bucket_medians.to_string(),
            self.median_bucket_capacity.to_string(),
        ]
    }
}

impl ToRow for ReferenceLeadTime {
    const HEADER: &'static [&'static str] = &[
        "origin_port_id",
        "destination_port_id",
        "reference_hours",
        "median_hours",
        "low_hours",
        "sample_size",
        "lane_leg_count",
        "lane_active_periods",
    ];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.lane.origin.to_string(),
            self.lane.destination.to_string(),
            self.reference_hours.to_string(),
            self.median_hours.to_string(),
            self.low_hours.to_string(),
            self.sample_size.to_string(),
            self.lane_leg_count.to_string(),
            self.lane_active_periods.to_string(),
        ]
    }
}

impl ToRow for PortStressRecord {
    const HEADER: &'static [&'static str] = &[
        "port_id",
        "month",
        "delayed_ships",
        "delayed_capacity",
        "capacity_sum",
        "port_delay",
        "contributing_units",
        "port_name",
        "country",
        "region",
        "latitude",
        "longitude",
    ];

    fn to_row(&self) -> Vec<String> {
        let mut row = vec![
            self.port_id.to_string(),
            self.month.to_string(),
            self.delayed_ships.to_string(),
            self.delayed_capacity.to_string(),
            self.capacity_sum.to_string(),
            number(self.port_delay),
            self.contributing_units.to_string(),
        ];
        row.extend(port_columns(self.port.as_ref()));
        row
    }
}

impl ToRow for RegionStressRecord {
    const HEADER: &'static [&'static str] =
        &["region", "month", "delayed_ships", "delayed_capacity", "ports"];

    fn to_row(&self) -> Vec<String> {
        vec![
            text(self.region.as_deref()),
            self.month.to_string(),
            self.delayed_ships.to_string(),
            self.delayed_capacity.to_string(),
            self.ports.to_string(),
        ]
    }
}

impl ToRow for MonthlyStressTotal {
    const HEADER: &'static [&'static str] = &["month", "delayed_ships", "delayed_capacity"];

    fn to_row(&self) -> Vec<String> {
        vec![
            self.month.to_string(),
            self.delayed_ships.to_string(),
            self.delayed_capacity.to_string(),
        ]
    }
}

// ==========================================
// 写出函数
// ==========================================

fn write_error(path: &Path, err: impl std::fmt::Display) -> ExportError {
    ExportError::WriteError {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// 写出单张表
pub fn write_table<'a, T, I>(path: &Path, rows: I) -> ExportResult<usize>
where
    T: ToRow + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let file = File::create(path).map_err(|e| write_error(path, e))?;
    let mut wtr = Writer::from_writer(file);
    wtr.write_record(T::HEADER).map_err(|e| write_error(path, e))?;

    let mut count = 0;
    for row in rows {
        wtr.write_record(&row.to_row()).map_err(|e| write_error(path, e))?;
        count += 1;
    }

    wtr.flush().map_err(|e| write_error(path, e))?;
    Ok(count)
}

pub fn write_legs(path: &Path, legs: &[Leg]) -> ExportResult<usize> {
    write_table(path, legs)
}

pub fn write_lane_buckets(path: &Path, buckets: &[LaneBucketStats]) -> ExportResult<usize> {
    write_table(path, buckets)
}

pub fn write_port_stress(path: &Path, records: &[PortStressRecord]) -> ExportResult<usize> {
    write_table(path, records)
}

pub fn write_region_stress(path: &Path, records: &[RegionStressRecord]) -> ExportResult<usize> {
    write_table(path, records)
}

pub fn write_monthly_totals(path: &Path, records: &[MonthlyStressTotal]) -> ExportResult<usize> {
    write_table(path, records)
}

pub fn write_lane_activity<'a, I>(path: &Path, lanes: I) -> ExportResult<usize>
where
    I: IntoIterator<Item = &'a LaneActivity>,
{
    write_table(path, lanes)
}

pub fn write_report(path: &Path, report: &PipelineReport) -> ExportResult<()> {
    let json = serde_json::to_string_pretty(report).map_err(|e| ExportError::SerializeError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    fs::write(path, json).map_err(|e| write_error(path, e))
}

fn remove_staging(dir: &Path) {
    if let Err(err) = fs::remove_dir_all(dir) {
        if err.kind() != std::io::ErrorKind::NotFound {
            warn!(dir = %dir.display(), error = %err, "暂存目录清理失败");
        }
    }
}

fn write_staged(dir: &Path, output: &PipelineOutput) -> ExportResult<()> {
    write_legs(&dir.join(LEGS_FILE), &output.legs)?;
    write_lane_buckets(&dir.join(LANE_MONTHLY_FILE), &output.lane_months)?;
    write_lane_buckets(&dir.join(LANE_WEEKLY_FILE), &output.lane_weeks)?;
    write_lane_activity(&dir.join(LANE_ACTIVITY_FILE), output.lane_activity.values())?;
    write_table(&dir.join(REFERENCE_FILE), output.references.values())?;
    write_port_stress(&dir.join(PORT_STRESS_FILE), &output.stress.port_months)?;
    write_region_stress(&dir.join(REGION_STRESS_FILE), &output.stress.region_months)?;
    write_monthly_totals(&dir.join(MONTHLY_STRESS_FILE), &output.stress.monthly_totals)?;
    write_report(&dir.join(REPORT_FILE), &output.report)
}

/// 写出全部结果到目录; 返回最终文件路径
pub fn write_all(out_dir: &Path, output: &PipelineOutput) -> ExportResult<Vec<PathBuf>> {
    let staging = out_dir.join(STAGING_DIR);
    remove_staging(&staging);
    fs::create_dir_all(&staging).map_err(|e| ExportError::DirectoryError {
        path: staging.display().to_string(),
        message: e.to_string(),
    })?;

    if let Err(err) = write_staged(&staging, output) {
        remove_staging(&staging);
        return Err(err);
    }

    let names = [
        LEGS_FILE,
        LANE_MONTHLY_FILE,
        LANE_WEEKLY_FILE,
        LANE_ACTIVITY_FILE,
        REFERENCE_FILE,
        PORT_STRESS_FILE,
        REGION_STRESS_FILE,
        MONTHLY_STRESS_FILE,
        REPORT_FILE,
    ];
    let mut targets = Vec::with_capacity(names.len());
    for name in names {
        let target = out_dir.join(name);
        if let Err(err) = fs::rename(staging.join(name), &target) {
            remove_staging(&staging);
            return Err(ExportError::CommitError {
                path: target.display().to_string(),
                committed: targets.len(),
                total: names.len(),
                message: err.to_string(),
            });
        }
        targets.push(target);
    }
    remove_staging(&staging);

    info!(dir = %out_dir.display(), files = targets.len(), "结果导出完成");
    Ok(targets)
}
