// ==========================================
// 事件/港口导入 集成测试
// ==========================================
// 测试目标: CSV → 字段映射 → DQ 校验 → 流水线
// ==========================================


use test_helpers::temp_csv;
use transit_stress::importer::{EventImporter, ImportError, PortImporter};
use transit_stress::{PipelineConfig, PipelineInput, StressPipeline};

const EVENT_HEADER: &str =
    "SHIP_ID,IMO,PORT_ID,MOVE_TYPE,TIMESTAMP_UTC,DRAUGHT,SHIP_CLASS_NAME,SHIPNAME,TEU,GROSS_TONNAGE";

#[test]
fn test_import_events_csv() {
    let file = temp_csv(&[
        EVENT_HEADER,
        "101,9300001,1,DEPARTURE,2021-10-01 06:00:00,120,PANAMAX,ALPHA,4500,52000",
        "101,9300001,1,DEPARTURE,2021-10-01 07:00:00,121,PANAMAX,ALPHA,4500,52000",
        "101,9300001,2,ARRIVAL,2021-10-03T10:00:00Z,,PANAMAX,ALPHA,4500,52000",
        "101,9300001,2,DEPARTURE,2021-10-03 18:30:00 UTC,118,PANAMAX,ALPHA,,",
        "202,,3,DEPARTURE,2021-10-02 00:00:00,nan,nan,BETA,-1,",
    ]);

    let batch = EventImporter::new().import(file.path()).unwrap();

    assert_eq!(batch.rows_read, 5);
    assert_eq!(batch.events.len(), 5);
    let last = &batch.events[4];
    assert_eq!(last.vessel_id, 202);
    assert_eq!(last.imo, None);
    assert_eq!(last.vessel_class, None);
    assert_eq!(last.row_number, 6);

    // 运力非正 → 提示级 DQ
    assert_eq!(batch.violations.len(), 1);
    assert_eq!(batch.violations[0].row_number, 6);
}

#[test]
fn test_import_flags_duplicates_without_removing() {
    let file = temp_csv(&[
        EVENT_HEADER,
        "101,9300001,1,DEPARTURE,2021-10-01 06:00:00,120,PANAMAX,ALPHA,4500,52000",
        "101,9300001,1,DEPARTURE,2021-10-01 06:00:00,120,PANAMAX,ALPHA,4500,52000",
    ]);

    let batch = EventImporter::new().import(file.path()).unwrap();
    assert_eq!(batch.events.len(), 2);
    assert_eq!(batch.violations.len(), 1);
    assert_eq!(batch.violations[0].row_number, 3);
}

#[test]
fn test_missing_required_field_is_fatal() {
    let file = temp_csv(&[
        EVENT_HEADER,
        "101,9300001,1,DEPARTURE,2021-10-01 06:00:00,120,PANAMAX,ALPHA,4500,52000",
        "101,9300001,,DEPARTURE,2021-10-01 07:00:00,120,PANAMAX,ALPHA,4500,52000",
    ]);

    match EventImporter::new().import(file.path()) {
        Err(ImportError::MissingRequiredField { row, field }) => {
            assert_eq!(row, 3);
            assert_eq!(field, "PORT_ID");
        }
        other => panic!("expected MissingRequiredField, got {other:?}"),
    }
}

#[test]
fn test_semicolon_delimited_file() {
    let file = temp_csv(&[
        "SHIP_ID;PORT_ID;MOVE_TYPE;TIMESTAMP_UTC;TEU",
        "1;10;DEPARTURE;2021-10-01 06:00:00;1000,5",
    ]);

    let batch = EventImporter::with_csv_delimiter(b';')
        .import(file.path())
        .unwrap();
    assert_eq!(batch.events[0].capacity_teu, Some(1000.5));
}

#[test]
fn test_unsupported_and_missing_files() {
    let result = EventImporter::new().import("/nonexistent/events.csv");
    assert!(matches!(result, Err(ImportError::FileNotFound(_))));

    let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let result = EventImporter::new().import(file.path());
    assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
}

#[test]
fn test_import_ports_and_run_pipeline() {
    let ports_file = temp_csv(&[
        "PORT_ID,PORT_NAME,Latitude,Longitude,un_code,country_3,Economy name,Maritime_Region",
        "1,Shanghai,31.23,121.47,CNSHA,CHN,China,East Asia",
        "2,Long Beach,33.75,-118.2,USLGB,USA,United States,nan",
    ]);
    let ports = PortImporter::new().import(ports_file.path()).unwrap();
    assert_eq!(ports.len(), 2);
    assert_eq!(ports[1].maritime_region, None);
    assert_eq!(ports[0].un_code.as_deref(), Some("CNSHA"));

    let mut lines = vec![EVENT_HEADER.to_string()];
    for vessel in 0..12 {
        let day = 1 + vessel;
        lines.push(format!(
            "{id},,1,DEPARTURE,2021-03-{day:02} 00:00:00,100,ULCV,V{id},14000,",
            id = 500 + vessel
        ));
        lines.push(format!(
            "{id},,2,DEPARTURE,2021-03-{end:02} 00:00:00,100,ULCV,V{id},14000,",
            id = 500 + vessel,
            end = day + if vessel == 0 { 15 } else { 10 }
        ));
    }
    let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
    let events_file = temp_csv(&refs);
    let batch = EventImporter::new().import(events_file.path()).unwrap();

    let output = StressPipeline::new(PipelineConfig::default())
        .unwrap()
        .run(PipelineInput::new(batch.events, ports).with_violations(batch.violations))
        .unwrap();

    assert_eq!(output.legs.len(), 12);
    assert_eq!(output.stress.port_months.len(), 1);
    assert_eq!(output.stress.region_months[0].region, None);
    assert_eq!(output.report.stress.delayed_units, 1);
}
