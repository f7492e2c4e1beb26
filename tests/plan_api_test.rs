// ==========================================
// 运行 API 集成测试
// ==========================================
// 测试目标: PlanApi 文件级运行（读取 → 分配 → 装车 → 写出）
// 覆盖范围: 模板路径、储备兜底、缺失文件、批量运行的失败隔离
// ==========================================

mod helpers;

use helpers::test_data_builder::{write_csv, DEMAND_HEADERS, RESERVE_HEADERS, TEMPLATE_HEADERS};
use reserve_planner::api::{ApiError, PlanApi, PlanRequest};
use reserve_planner::config::RunConfig;
use reserve_planner::engine::{CollectingEventSink, PlanEvent};
use reserve_planner::importer::field_mapper::output_columns;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

// ==========================================
// 测试夹具
// ==========================================

struct Fixture {
    _dir: TempDir,
    demand: PathBuf,
    reserve: PathBuf,
    template: PathBuf,
    output: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();

    let demand = write_csv(
        dir.path(),
        "demand.csv",
        &DEMAND_HEADERS,
        &[
            &["10", "РЦ Север", "100", "Молоко", "150", "0"],
            &["11", "РЦ Юг", "200", "Кефир", "", "45"],
        ],
    );
    let reserve = write_csv(
        dir.path(),
        "reserve.csv",
        &RESERVE_HEADERS,
        &[
            &["7", "ООО Ромашка", "100", "Молоко", "500", "8", "10"],
            &["9", "ИП Лето", "200", "Кефир", "300", "", "9"],
        ],
    );
    let template = write_csv(
        dir.path(),
        "template.csv",
        &TEMPLATE_HEADERS,
        &[
            &[
                "2025-07-01", "7", "ООО Ромашка", "100", "Молоко", "10", "РЦ Север", "60", "3",
                "10", "6",
            ],
            &[
                "2025-07-01", "8", "ООО Восток", "100", "Молоко", "10", "РЦ Север", "90", "2",
                "10", "9",
            ],
        ],
    );
    let output = dir.path().join("out").join("result.csv");

    Fixture {
        _dir: dir,
        demand,
        reserve,
        template,
        output,
    }
}

fn read_output(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers = reader
        .headers()
        .unwrap()
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(|c| c.to_string()).collect())
        .collect();
    (headers, rows)
}

// ==========================================
// 单次运行
// ==========================================

#[test]
fn test_run_with_template_writes_sorted_output() {
    let fx = fixture();
    let api = PlanApi::new(RunConfig::default());
    let request = PlanRequest::new(&fx.demand, &fx.reserve)
        .with_template(&fx.template)
        .with_output(&fx.output);

    let report = api.run_files(&request).unwrap();

    assert_eq!(report.output_path, fx.output);
    assert_eq!(report.demand_records, 2);
    assert_eq!(report.allocation_items, 3);
    assert_eq!(report.output_rows, 3);
    assert_eq!(report.trucks, 3);

    let (headers, rows) = read_output(&fx.output);
    let expected_headers: Vec<String> = output_columns::HEADERS
        .iter()
        .map(|h| h.to_string())
        .collect();
    assert_eq!(headers, expected_headers);
    assert_eq!(rows.len(), 3);

    // 模板拆分: 供应商 7 → 1 号车，供应商 8 → 2 号车
    assert_eq!(
        rows[0],
        vec![
            "2025-07-01", "7", "ООО Ромашка", "100", "Молоко", "10", "РЦ Север", "60", "1", "3",
            "10", "6", ""
        ]
    );
    assert_eq!(rows[1][1], "8");
    assert_eq!(rows[1][2], "ООО Восток");
    assert_eq!(rows[1][8], "2");
    assert_eq!(rows[1][9], "2");
    assert_eq!(rows[1][11], "9");

    // 无模板键走储备兜底: 45 / 9 = 5 托盘
    assert_eq!(
        rows[2],
        vec![
            "2025-07-02", "9", "ИП Лето", "200", "Кефир", "11", "РЦ Юг", "45", "3", "1", "9", "5",
            ""
        ]
    );
}

#[test]
fn test_run_without_template_uses_reserve_fallback() {
    let fx = fixture();
    let api = PlanApi::new(RunConfig::default());
    let request = PlanRequest::new(&fx.demand, &fx.reserve).with_output(&fx.output);

    let report = api.run_files(&request).unwrap();
    assert_eq!(report.allocation_items, 2);
    assert_eq!(report.trucks, 3);

    // 150 / 10 = 15 托盘，供应商 7 整车 8 → 8 + 7
    let (_, rows) = read_output(&fx.output);
    let slices: Vec<(&str, &str, &str)> = rows
        .iter()
        .map(|r| (r[1].as_str(), r[8].as_str(), r[11].as_str()))
        .collect();
    assert_eq!(
        slices,
        vec![("7", "1", "8"), ("7", "2", "7"), ("9", "3", "5")]
    );
}

#[test]
fn test_template_ignored_when_disabled() {
    let fx = fixture();
    let config = RunConfig {
        use_template: false,
        ..RunConfig::default()
    };
    let sink = Arc::new(CollectingEventSink::new());
    let api = PlanApi::with_sink(config, sink.clone());
    let request = PlanRequest::new(&fx.demand, &fx.reserve)
        .with_template(&fx.template)
        .with_output(&fx.output);

    let report = api.run_files(&request).unwrap();
    assert_eq!(report.allocation_items, 2);

    let loaded: Vec<String> = sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            PlanEvent::TableLoaded { table, .. } => Some(table),
            _ => None,
        })
        .collect();
    assert_eq!(loaded, vec!["demand".to_string(), "reserve".to_string()]);
}

#[test]
fn test_progress_events_cover_whole_run() {
    let fx = fixture();
    let sink = Arc::new(CollectingEventSink::new());
    let api = PlanApi::with_sink(RunConfig::default(), sink.clone());
    let request = PlanRequest::new(&fx.demand, &fx.reserve)
        .with_template(&fx.template)
        .with_output(&fx.output);

    api.run_files(&request).unwrap();

    let events = sink.events();
    assert_eq!(events.len(), 7);
    assert!(matches!(events[0], PlanEvent::TableLoaded { records: 2, .. }));
    assert!(matches!(events[1], PlanEvent::TableLoaded { records: 2, .. }));
    assert!(matches!(events[2], PlanEvent::TableLoaded { records: 1, .. }));
    assert_eq!(events[5], PlanEvent::TrucksPacked { rows: 3, trucks: 3 });
    assert!(matches!(events[6], PlanEvent::OutputWritten { rows: 3, .. }));
}

#[test]
fn test_xlsx_output_feeds_next_run_as_template() {
    let fx = fixture();
    let api = PlanApi::new(RunConfig::default());
    let workbook = fx.output.with_file_name("result.xlsx");

    let first = api
        .run_files(
            &PlanRequest::new(&fx.demand, &fx.reserve)
                .with_template(&fx.template)
                .with_output(&workbook),
        )
        .unwrap();
    assert_eq!(first.output_rows, 3);
    assert!(workbook.exists());

    // 上一次的输出工作簿作为本次模板: 拆分与肩距保持不变
    let second = api
        .run_files(
            &PlanRequest::new(&fx.demand, &fx.reserve)
                .with_template(&workbook)
                .with_output(&fx.output),
        )
        .unwrap();
    assert_eq!(second.allocation_items, 3);
    assert_eq!(second.trucks, 3);

    let (_, rows) = read_output(&fx.output);
    assert_eq!(
        rows[0],
        vec![
            "2025-07-01", "7", "ООО Ромашка", "100", "Молоко", "10", "РЦ Север", "60", "1", "3",
            "10", "6", ""
        ]
    );
    assert_eq!(rows[1][2], "ООО Восток");
    assert_eq!(rows[1][11], "9");
    assert_eq!(
        rows[2],
        vec![
            "2025-07-02", "9", "ИП Лето", "200", "Кефир", "11", "РЦ Юг", "45", "3", "1", "9", "5",
            ""
        ]
    );
}

#[test]
fn test_missing_demand_file() {
    let fx = fixture();
    let api = PlanApi::new(RunConfig::default());
    let request = PlanRequest::new(fx.demand.with_file_name("absent.csv"), &fx.reserve);

    let result = api.run_files(&request);
    assert!(matches!(result, Err(ApiError::Import(_))));
    assert!(!fx.output.exists());
}

// ==========================================
// 批量运行
// ==========================================

#[tokio::test]
async fn test_batch_isolates_failures_and_keeps_order() {
    let fx = fixture();
    let api = PlanApi::new(RunConfig::default());
    let second_output = fx.output.with_file_name("second.csv");

    let requests = vec![
        PlanRequest::new(&fx.demand, &fx.reserve)
            .with_template(&fx.template)
            .with_output(&fx.output),
        PlanRequest::new(&fx.demand, fx.reserve.with_file_name("absent.csv")),
        PlanRequest::new(&fx.demand, &fx.reserve).with_output(&second_output),
    ];

    let results = api.run_batch(requests).await;

    assert_eq!(results.len(), 3);
    let first = results[0].as_ref().unwrap();
    assert_eq!(first.output_path, fx.output);
    assert!(results[1].is_err());
    let third = results[2].as_ref().unwrap();
    assert_eq!(third.output_path, second_output);
    assert_ne!(first.run_id, third.run_id);
    assert!(second_output.exists());
}
