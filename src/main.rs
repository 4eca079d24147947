// ==========================================
// 冷水机组能效监测系统 - 命令行入口
// ==========================================
// 用途: 初始化数据库,批量导入读数文件
// 用法: chiller-telemetry <读数文件.csv|.xlsx> [操作人ID]
// ==========================================

use chiller_telemetry::config::AppConfig;
use chiller_telemetry::db::{init_schema, open_sqlite_connection};
use chiller_telemetry::reference::{BuiltinAltitudeTable, BuiltinRefrigerantTable};
use chiller_telemetry::service::{
    AlertEvaluator, IngestRepositories, IngestService, TracingTransport,
};
use chiller_telemetry::BulkImporter;
use std::sync::{Arc, Mutex};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    chiller_telemetry::logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", chiller_telemetry::APP_NAME);
    tracing::info!("系统版本: {}", chiller_telemetry::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::from_env();
    tracing::info!("使用数据库: {}", config.db_path);
    tracing::info!("运行环境: {:?}", config.environment);

    // 初始化数据库连接与 schema
    let conn = open_sqlite_connection(&config.db_path)?;
    init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    // 装配摄取管线
    let repos = IngestRepositories::from_connection(conn);
    let alert_evaluator = AlertEvaluator::new(
        repos.alert_rule_repo.clone(),
        Arc::new(TracingTransport),
    );
    let ingest = Arc::new(IngestService::new(
        repos.clone(),
        Arc::new(BuiltinRefrigerantTable::new()),
        Arc::new(BuiltinAltitudeTable::new()),
        alert_evaluator,
        config,
    ));

    let mut args = std::env::args().skip(1);
    let Some(file_path) = args.next() else {
        println!("用法: chiller-telemetry <读数文件.csv|.xlsx> [操作人ID]");
        println!("数据库已初始化,未指定导入文件。");
        return Ok(());
    };
    let actor_id = args.next().unwrap_or_else(|| "system".to_string());

    // 批量导入
    let importer = BulkImporter::new(
        ingest,
        repos.equipment_repo.clone(),
        repos.quarantine_repo.clone(),
        repos.timeline_repo.clone(),
    );
    let summary = importer.import_file(&file_path, &actor_id).await?;

    println!("导入完成:");
    println!("  总行数:       {}", summary.total_rows);
    println!("  提交:         {}", summary.committed);
    println!("  隔离:         {}", summary.quarantined);
    println!("  批内重复:     {}", summary.intra_file_dups);
    println!("  与存量重复:   {}", summary.duplicate_readings);
    println!("  失败:         {}", summary.failed);

    Ok(())
}
