// ==========================================
// 冷水机组能效监测系统 - 批量导入集成测试
// ==========================================
// 覆盖: CSV 解析、批内自然键预去重、设备解析、隔离路由、存量去重
// ==========================================

mod test_helpers;

use chiller_telemetry::config::Environment;
use chiller_telemetry::domain::types::TimelineKind;
use chiller_telemetry::BulkImporter;
use std::io::Write;
use test_helpers::{build_pipeline, complete_reading, default_profile, seed_equipment, TestContext};

const CSV_HEADER: &str = "序列号,设备编号,日期,时间,时区,\
冷凝器进水温度,冷凝器出水温度,蒸发器进水温度,蒸发器出水温度,室外温度,\
冷凝器制冷剂温度,蒸发器制冷剂温度,冷凝器压力,蒸发器压力,\
1相电流,2相电流,3相电流,1相电压,2相电压,3相电压,\
油压高端,油压低端,油压差,运行小时,抽气分钟,备注";

/// 与 default_profile("EQ1") 匹配的完整数据行
fn complete_row(serial: &str, equipment_no: &str, time: &str) -> String {
    format!(
        "{serial},{equipment_no},2026-03-01,{time},+08:00,\
         85.0,95.0,54.0,44.0,90.0,\
         97.0,40.0,120.0,35.0,\
         97.0,100.0,103.0,460.0,460.0,460.0,\
         45.0,27.0,,1200.0,5.0,正常"
    )
}

fn build_importer(ctx: &TestContext) -> BulkImporter {
    BulkImporter::new(
        ctx.ingest.clone(),
        ctx.repos.equipment_repo.clone(),
        ctx.repos.quarantine_repo.clone(),
        ctx.repos.timeline_repo.clone(),
    )
}

#[tokio::test]
async fn test_bulk_import_mixed_rows() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));
    let importer = build_importer(&ctx);

    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{}", CSV_HEADER).unwrap();
    // 行1: 有效 → 提交
    writeln!(file, "{}", complete_row("SN-EQ1", "CH-EQ1", "08:00")).unwrap();
    // 行2: 与行1自然键重复 → 批内预去重跳过
    writeln!(file, "{}", complete_row("SN-EQ1", "CH-EQ1", "08:00")).unwrap();
    // 行3: 未知序列号 → 设备不可解析,直接隔离
    writeln!(file, "{}", complete_row("SN-UNKNOWN", "CH-9", "09:00")).unwrap();
    // 行4: 缺室外温度 → 校验清单隔离
    writeln!(
        file,
        "SN-EQ1,CH-EQ1,2026-03-01,10:00,+08:00,\
         85.0,95.0,54.0,44.0,,\
         97.0,40.0,120.0,35.0,\
         97.0,100.0,103.0,460.0,460.0,460.0,\
         45.0,27.0,,1200.0,5.0,缺数补录"
    )
    .unwrap();

    let summary = importer.import_file(file.path(), "IMPORTER").await.unwrap();

    assert_eq!(summary.total_rows, 4);
    assert_eq!(summary.committed, 1);
    assert_eq!(summary.intra_file_dups, 1);
    assert_eq!(summary.quarantined, 2);
    assert_eq!(summary.duplicate_readings, 0);
    assert_eq!(summary.failed, 0);

    // 提交的日志走了与手工录入相同的管线
    let logs = ctx.repos.log_repo.list_by_equipment("EQ1").unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].actor_id, "IMPORTER");
    assert_eq!(logs[0].metrics.load_factor_display, "85.8333");

    // 校验清单隔离记录落在 EQ1 名下
    let quarantined = ctx.repos.quarantine_repo.list_by_equipment("EQ1").unwrap();
    assert_eq!(quarantined.len(), 1);
    assert_eq!(
        quarantined[0].invalid_fields,
        vec!["outside_air_temp".to_string()]
    );

    // 设备不可解析的行以自然键伪标识隔离
    let unresolved = ctx
        .repos
        .quarantine_repo
        .list_by_equipment("SN-UNKNOWN/CH-9")
        .unwrap();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].invalid_fields, vec!["equipment".to_string()]);

    // 每次隔离/提交各有一条时间线事件
    let eq1_events = ctx.repos.timeline_repo.list_by_equipment("EQ1").unwrap();
    assert_eq!(eq1_events.len(), 2); // NEW + BAD
    let unresolved_events = ctx
        .repos
        .timeline_repo
        .list_by_equipment("SN-UNKNOWN/CH-9")
        .unwrap();
    assert_eq!(unresolved_events.len(), 1);
    assert_eq!(unresolved_events[0].kind, TimelineKind::BadReading);
}

#[tokio::test]
async fn test_bulk_import_duplicate_against_existing_log() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    // 预先手工录入 08:00 的读数
    ctx.ingest
        .ingest_reading(complete_reading("EQ1", "08:00"), "USER1")
        .await
        .unwrap();

    let importer = build_importer(&ctx);
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{}", CSV_HEADER).unwrap();
    writeln!(file, "{}", complete_row("SN-EQ1", "CH-EQ1", "08:00")).unwrap();
    writeln!(file, "{}", complete_row("SN-EQ1", "CH-EQ1", "12:00")).unwrap();

    let summary = importer.import_file(file.path(), "IMPORTER").await.unwrap();

    assert_eq!(summary.total_rows, 2);
    assert_eq!(summary.duplicate_readings, 1); // 08:00 与存量冲突
    assert_eq!(summary.committed, 1); // 12:00 正常提交
    assert_eq!(ctx.repos.log_repo.list_by_equipment("EQ1").unwrap().len(), 2);
}

#[tokio::test]
async fn test_bulk_import_non_numeric_cell_quarantines() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));
    let importer = build_importer(&ctx);

    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{}", CSV_HEADER).unwrap();
    // 运行小时为非数值文本
    writeln!(
        file,
        "SN-EQ1,CH-EQ1,2026-03-01,08:00,+08:00,\
         85.0,95.0,54.0,44.0,90.0,\
         97.0,40.0,120.0,35.0,\
         97.0,100.0,103.0,460.0,460.0,460.0,\
         45.0,27.0,,待查,5.0,表头错位?"
    )
    .unwrap();

    let summary = importer.import_file(file.path(), "IMPORTER").await.unwrap();
    assert_eq!(summary.quarantined, 1);
    assert_eq!(summary.committed, 0);

    let quarantined = ctx.repos.quarantine_repo.list_by_equipment("EQ1").unwrap();
    assert_eq!(quarantined[0].invalid_fields, vec!["run_hours".to_string()]);
}

#[tokio::test]
async fn test_bulk_import_unsupported_extension() {
    let ctx = build_pipeline(Environment::Local);
    let importer = build_importer(&ctx);

    let err = importer
        .import_file("/tmp/readings.txt", "IMPORTER")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        chiller_telemetry::importer::ImportError::UnsupportedFormat(_)
    ));
}
