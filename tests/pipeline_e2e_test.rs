// ==========================================
// 压力指数流水线 端到端测试
// ==========================================
// 测试目标: 事件 → 停靠 → 航段 → 航线 → 基准时长 → 压力指标
// ==========================================


use std::collections::BTreeMap;
use test_helpers::{default_ports, hours, lane_trip, voyage, EventBuilder};
use transit_stress::config::PipelineConfig;
use transit_stress::domain::{OverrideField, PortOverride};
use transit_stress::{
    logging, ActivityBasis, DelayBasis, Event, LaneKey, PipelineInput, PortTable,
    StressCalculator, StressPipeline, TrafficFilter, TrafficType,
};

/// 航线 1 → 2: 10 条 24 小时航段 + 1 条 240 小时航段（均在 2021-01）
fn eleven_leg_lane() -> Vec<Event> {
    let mut events = Vec::new();
    for i in 0..11 {
        let elapsed = if i == 10 { 240 } else { 24 };
        events.extend(lane_trip(100 + i, 1, 2, hours(i * 48), elapsed, 1000.0));
    }
    events
}

fn pipeline(config: PipelineConfig) -> StressPipeline {
    StressPipeline::new(config).unwrap()
}

#[test]
fn test_run_collapse_and_leg_pairing() {
    logging::init_test();

    let mut events = voyage(1, &[1, 1, 1, 2, 2, 3], 0, 1, 5000.0);
    events.push(EventBuilder::departure(2, 1, hours(3)).class("FEEDER").build());

    let output = pipeline(PipelineConfig::default())
        .run(PipelineInput::new(events, default_ports()))
        .unwrap();
    let report = &output.report;

    assert_eq!(report.collapse.visits_out, 3);
    assert_eq!(report.collapse.events_collapsed, 3);
    assert_eq!(report.collapse.single_observation_vessels, 1);
    assert_eq!(report.collapse.single_observation_events, 1);

    let legs: Vec<(i64, i64, f64)> = output
        .legs
        .iter()
        .map(|l| (l.origin_port_id, l.destination_port_id, l.elapsed_hours))
        .collect();
    assert_eq!(legs, vec![(1, 2, 2.0), (2, 3, 1.0)]);
    assert_eq!(report.legs.without_predecessor, 1);

    for leg in &output.legs {
        assert_ne!(leg.origin_port_id, leg.destination_port_id);
        assert!(leg.elapsed_hours >= 0.0);
        assert_eq!(leg.capacity_teu, Some(5000.0));
        assert_eq!(leg.traffic_type, TrafficType::Global);
    }
}

#[test]
fn test_eleven_leg_lane_only_outlier_is_delayed() {
    let output = pipeline(PipelineConfig::default())
        .run(PipelineInput::new(eleven_leg_lane(), default_ports()))
        .unwrap();

    let reference = &output.references[&LaneKey::new(1, 2)];
    assert_eq!(reference.reference_hours, 24.0);
    assert_eq!(reference.lane_leg_count, 11);

    let stress = &output.stress;
    assert_eq!(stress.port_months.len(), 1);
    let record = &stress.port_months[0];
    assert_eq!(record.port_id, 2);
    assert_eq!(record.month.to_string(), "2021-01");
    assert!((record.delayed_ships - 216.0 / 730.0).abs() < 1e-12);
    assert!((record.delayed_capacity - 1000.0 * 216.0 / 730.0).abs() < 1e-9);
    assert_eq!(record.capacity_sum, 11_000.0);
    assert!((record.port_delay.unwrap() - 216.0 * 1000.0 / 11_000.0).abs() < 1e-9);

    assert_eq!(output.report.stress.units_used, 11);
    assert_eq!(output.report.stress.delayed_units, 1);

    assert_eq!(stress.region_months.len(), 1);
    assert_eq!(
        stress.region_months[0].region.as_deref(),
        Some("North America West Coast")
    );
    assert_eq!(stress.monthly_totals.len(), 1);
}

#[test]
fn test_low_activity_lane_excluded() {
    let events: Vec<Event> = eleven_leg_lane()
        .into_iter()
        .filter(|e| e.vessel_id != 100)
        .collect();

    let output = pipeline(PipelineConfig::default())
        .run(PipelineInput::new(events, default_ports()))
        .unwrap();

    // 航线仍有基准时长,但活跃度 = 10 不满足 > 10
    assert!(output.references.contains_key(&LaneKey::new(1, 2)));
    assert!(output.stress.port_months.is_empty());
    assert_eq!(output.report.stress.insufficient_sample, 10);
}

#[test]
fn test_active_periods_basis_excludes_single_month_lane() {
    let config = PipelineConfig {
        activity_basis: ActivityBasis::ActivePeriods,
        ..PipelineConfig::default()
    };
    let output = pipeline(config)
        .run(PipelineInput::new(eleven_leg_lane(), default_ports()))
        .unwrap();

    assert!(output.stress.port_months.is_empty());
    assert_eq!(output.lane_activity[&LaneKey::new(1, 2)].active_periods, 1);
    assert_eq!(output.report.stress.insufficient_sample, 11);
}

#[test]
fn test_lane_month_basis_uses_bucket_median() {
    let config = PipelineConfig {
        delay_basis: DelayBasis::LaneMonth,
        ..PipelineConfig::default()
    };
    let output = pipeline(config)
        .run(PipelineInput::new(eleven_leg_lane(), default_ports()))
        .unwrap();

    // 月中位数 24h = 基准 24h → 无延误
    let record = &output.stress.port_months[0];
    assert_eq!(record.delayed_capacity, 0.0);
    assert_eq!(record.capacity_sum, 11_000.0);
    assert_eq!(output.report.stress.units_in, 1);
}

#[test]
fn test_missing_reference_is_not_zero_delay() {
    let output = pipeline(PipelineConfig::default())
        .run(PipelineInput::new(eleven_leg_lane(), default_ports()))
        .unwrap();

    let calculator = StressCalculator::new(&PipelineConfig::default());
    let (stress, counts) = calculator.compute(
        &output.legs,
        &output.lane_months,
        &BTreeMap::new(),
        &PortTable::default(),
    );

    assert!(stress.port_months.is_empty());
    assert_eq!(counts.missing_reference, 11);
    assert_eq!(counts.units_used, 0);
}

#[test]
fn test_rerun_is_idempotent() {
    let mut events = eleven_leg_lane();
    events.extend(voyage(7, &[3, 1, 2, 3], 30, 36, 2000.0));

    let pipeline = pipeline(PipelineConfig::default());
    let first = pipeline
        .run(PipelineInput::new(events.clone(), default_ports()))
        .unwrap();
    let second = pipeline
        .run(PipelineInput::new(events, default_ports()))
        .unwrap();

    assert_eq!(first.stress, second.stress);
    assert_eq!(first.legs, second.legs);
    assert_eq!(first.lane_months, second.lane_months);
    assert_ne!(first.report.run_id, second.report.run_id);
}

#[test]
fn test_traffic_filter_regional() {
    let mut events = eleven_leg_lane();
    events.extend(vec![
        EventBuilder::departure(50, 3, hours(0)).class("Feeder").teu(800.0).build(),
        EventBuilder::arrival(50, 1, hours(20)).class("Feeder").build(),
        EventBuilder::departure(50, 1, hours(30)).class("Feeder").teu(800.0).build(),
    ]);

    let input = PipelineInput::new(events, default_ports())
        .with_traffic_filter(TrafficFilter::Only(TrafficType::Regional));
    let output = pipeline(PipelineConfig::default()).run(input).unwrap();

    assert_eq!(output.legs.len(), 1);
    assert_eq!(output.legs[0].vessel_id, 50);
    assert_eq!(output.legs[0].traffic_type, TrafficType::Regional);
    assert_eq!(output.report.normalize.non_departures_dropped, 1);
    assert_eq!(output.report.normalize.traffic_mismatch_dropped, 22);
}

#[test]
fn test_port_overrides_apply_by_id() {
    let config = PipelineConfig {
        port_overrides: vec![
            PortOverride {
                port_id: 2,
                field: OverrideField::MaritimeRegion,
                value: "Pacific".to_string(),
            },
            PortOverride {
                port_id: 999,
                field: OverrideField::CountryIso3,
                value: "USA".to_string(),
            },
        ],
        ..PipelineConfig::default()
    };

    // 港口表顺序打乱不影响修正结果
    let mut ports = default_ports();
    ports.reverse();

    let pipeline = pipeline(config);
    let table = pipeline.build_port_table(ports.clone());
    assert_eq!(table.region_of(2), Some("Pacific"));
    assert_eq!(table.region_of(1), Some("East Asia"));

    let output = pipeline
        .run(PipelineInput::new(eleven_leg_lane(), ports))
        .unwrap();
    assert_eq!(output.stress.region_months[0].region.as_deref(), Some("Pacific"));
}

#[test]
fn test_unknown_ports_kept_with_markers() {
    let output = pipeline(PipelineConfig::default())
        .run(PipelineInput::new(eleven_leg_lane(), Vec::new()))
        .unwrap();

    assert_eq!(output.legs.len(), 11);
    assert!(output.legs.iter().all(|l| l.origin.is_none() && l.destination.is_none()));
    assert_eq!(output.report.legs.unknown_origin_port, 11);
    assert_eq!(output.report.legs.unknown_destination_port, 11);
    assert_eq!(output.stress.region_months[0].region, None);
    assert_eq!(output.report.stress.ports_without_region, 1);
}

#[test]
fn test_lane_profile() {
    let mut events = Vec::new();
    // 每月一次 1 → 2 航行, 1-4 月时长 100 / 110 / 120 / 300
    for (i, elapsed) in [100, 110, 120, 300].iter().enumerate() {
        events.extend(lane_trip(200 + i as i64, 1, 2, hours(i as i64 * 744), *elapsed, 900.0));
    }

    let pipeline = pipeline(PipelineConfig::default());
    let output = pipeline
        .run(PipelineInput::new(events, default_ports()))
        .unwrap();

    let profile = pipeline.lane_profile(&output, LaneKey::new(1, 2)).unwrap();
    assert_eq!(profile.periods, 4);
    assert_eq!(profile.median, 115.0);
    assert_eq!(profile.q25, 107.5);
    assert!(pipeline.lane_profile(&output, LaneKey::new(2, 1)).is_err());
}

#[test]
fn test_report_summary_lists_every_stage() {
    let output = pipeline(PipelineConfig::default())
        .run(PipelineInput::new(eleven_leg_lane(), default_ports()))
        .unwrap();

    let summary = output.report.to_string();
    assert!(summary.contains(&output.report.run_id));
    for stage in ["[规范化]", "[折叠]", "[航段]", "[航线]", "[压力]", "[DQ]"] {
        assert!(summary.contains(stage), "missing {stage}");
    }
    let stages: Vec<&str> = output
        .report
        .stage_elapsed_ms
        .iter()
        .map(|(s, _)| s.as_str())
        .collect();
    assert_eq!(stages, vec!["normalize", "collapse", "legs", "lanes", "reference", "stress"]);
}
