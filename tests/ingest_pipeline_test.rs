// ==========================================
// 冷水机组能效监测系统 - 摄取管线集成测试
// ==========================================
// 覆盖: 提交/隔离分类、去重、舍入口径、损失分解、连续性追踪
// ==========================================

mod test_helpers;

use chiller_telemetry::config::Environment;
use chiller_telemetry::domain::types::{OilPressureMode, TimelineKind, WiringMode};
use chiller_telemetry::service::{IngestOutcome, ServiceError};
use chrono::Utc;
use test_helpers::{build_pipeline, complete_reading, default_profile, seed_equipment};

// ==========================================
// 提交路径
// ==========================================

#[tokio::test]
async fn test_complete_reading_commits_with_one_timeline_event() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    let outcome = ctx
        .ingest
        .ingest_reading(complete_reading("EQ1", "08:00"), "USER1")
        .await
        .expect("摄取应成功");

    let log = match outcome {
        IngestOutcome::Committed(log) => log,
        IngestOutcome::Quarantined(q) => panic!("不应隔离: {:?}", q.invalid_fields),
    };
    assert_eq!(log.equipment_id, "EQ1");
    assert_eq!(log.company_id, "CO001");

    // 恰好一条 ComputedLog
    let logs = ctx.repos.log_repo.list_by_equipment("EQ1").unwrap();
    assert_eq!(logs.len(), 1);

    // 恰好一条 NEW_READING 事件
    let events = ctx.repos.timeline_repo.list_by_equipment("EQ1").unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, TimelineKind::NewReading);

    // 无隔离记录
    assert!(ctx
        .repos
        .quarantine_repo
        .list_by_equipment("EQ1")
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_committed_log_roundtrips_metrics() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    let outcome = ctx
        .ingest
        .ingest_reading(complete_reading("EQ1", "08:00"), "USER1")
        .await
        .unwrap();
    let IngestOutcome::Committed(log) = outcome else {
        panic!("应为提交结果");
    };

    let stored = ctx
        .repos
        .log_repo
        .find_by_id(&log.log_id)
        .unwrap()
        .expect("日志应可回读");
    assert!((stored.metrics.load_factor - log.metrics.load_factor).abs() < 1e-9);
    assert_eq!(stored.metrics.load_factor_display, "85.8333");
    assert_eq!(stored.ts_utc, log.ts_utc);
}

// ==========================================
// 舍入口径与损失分解(可测性质)
// ==========================================

#[tokio::test]
async fn test_rounding_law_on_stored_fields() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    let IngestOutcome::Committed(log) = ctx
        .ingest
        .ingest_reading(complete_reading("EQ1", "08:00"), "USER1")
        .await
        .unwrap()
    else {
        panic!("应为提交结果");
    };
    let m = &log.metrics;

    // 每个入库派生字段等于其 4 位小数舍入值(容差 1e-4)
    let round4 = |v: f64| (v * 10_000.0).round() / 10_000.0;
    for (name, v) in [
        ("load_factor", m.load_factor),
        ("total_loss", m.total_loss),
        ("non_cond_loss", m.non_cond_loss),
        ("loss_cost", m.loss_cost),
        ("kwh_loss", m.kwh_loss),
    ] {
        assert!(
            (v - round4(v)).abs() < 1e-4,
            "{} 未按4位小数舍入: {}",
            name,
            v
        );
    }
    // 展示损失为 2 位小数
    let round2 = |v: f64| (v * 100.0).round() / 100.0;
    assert!((m.eff_loss - round2(m.eff_loss)).abs() < 1e-9);
}

#[tokio::test]
async fn test_loss_decomposition_and_actual_cost_laws() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    let IngestOutcome::Committed(log) = ctx
        .ingest
        .ingest_reading(complete_reading("EQ1", "08:00"), "USER1")
        .await
        .unwrap()
    else {
        panic!("应为提交结果");
    };
    let m = &log.metrics;

    let family_sum = m.inlet_temp_loss
        + m.cond_approach_loss
        + m.evap_temp_loss
        + m.evap_approach_loss
        + m.non_cond_loss
        + m.delta_t_loss;
    assert!((m.total_loss - family_sum).abs() < 1e-4);
    assert!((m.actual_cost - m.target_cost * (1.0 + m.total_loss / 100.0)).abs() < 0.01);
}

// ==========================================
// 场景 A: 单相接线 + 仅压差油压模式
// ==========================================

#[tokio::test]
async fn test_scenario_a_single_phase_differential_only() {
    let ctx = build_pipeline(Environment::Local);
    let mut profile = default_profile("EQ1");
    profile.wiring_mode = WiringMode::SinglePhase;
    profile.oil_pressure_mode = OilPressureMode::DifferentialOnly;
    seed_equipment(&ctx, &profile);

    // 只提供 1 相电流/电压 + 油压差
    let mut raw = complete_reading("EQ1", "08:00");
    raw.amps_phase2 = None;
    raw.amps_phase3 = None;
    raw.volts_phase2 = None;
    raw.volts_phase3 = None;
    raw.oil_pressure_high = None;
    raw.oil_pressure_low = None;
    raw.oil_pressure_diff = Some(18.0);

    let IngestOutcome::Committed(log) = ctx.ingest.ingest_reading(raw, "USER1").await.unwrap()
    else {
        panic!("单相读数不应隔离");
    };

    // 归一化输出: 2/3相与高/低油压归零
    assert_eq!(log.amps_phase2, 0.0);
    assert_eq!(log.amps_phase3, 0.0);
    assert_eq!(log.volts_phase2, 0.0);
    assert_eq!(log.volts_phase3, 0.0);
    assert_eq!(log.oil_pressure_high, 0.0);
    assert_eq!(log.oil_pressure_low, 0.0);
    assert_eq!(log.oil_pressure_diff, 18.0);
    assert_eq!(log.metrics.final_oil_diff, 18.0);
}

// ==========================================
// 场景 B: 去重
// ==========================================

#[tokio::test]
async fn test_scenario_b_duplicate_rejected() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    ctx.ingest
        .ingest_reading(complete_reading("EQ1", "08:00"), "USER1")
        .await
        .unwrap();

    // 同设备同本地日期/时间/时区 → 第二次拒绝
    let err = ctx
        .ingest
        .ingest_reading(complete_reading("EQ1", "08:00"), "USER2")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateReading { .. }));

    // 存量仍然恰好一条
    assert_eq!(ctx.repos.log_repo.list_by_equipment("EQ1").unwrap().len(), 1);
    // 时间线也只有首次提交的一条
    assert_eq!(
        ctx.repos.timeline_repo.list_by_equipment("EQ1").unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_duplicate_key_freed_by_soft_delete() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    let IngestOutcome::Committed(log) = ctx
        .ingest
        .ingest_reading(complete_reading("EQ1", "08:00"), "USER1")
        .await
        .unwrap()
    else {
        panic!("应为提交结果");
    };

    ctx.repos.log_repo.soft_delete(&log.log_id, Utc::now()).unwrap();

    // 软删除后去重键释放,同键读数可再次提交
    let outcome = ctx
        .ingest
        .ingest_reading(complete_reading("EQ1", "08:00"), "USER1")
        .await
        .unwrap();
    assert!(matches!(outcome, IngestOutcome::Committed(_)));
}

#[tokio::test]
async fn test_unknown_equipment_persists_nothing() {
    let ctx = build_pipeline(Environment::Local);

    let err = ctx
        .ingest
        .ingest_reading(complete_reading("EQ404", "08:00"), "USER1")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation { .. }));

    assert!(ctx.repos.log_repo.list_by_equipment("EQ404").unwrap().is_empty());
    assert!(ctx
        .repos
        .quarantine_repo
        .list_by_equipment("EQ404")
        .unwrap()
        .is_empty());
    assert!(ctx
        .repos
        .timeline_repo
        .list_by_equipment("EQ404")
        .unwrap()
        .is_empty());
}

// ==========================================
// 场景 C: 缺室外温度 → 隔离
// ==========================================

#[tokio::test]
async fn test_scenario_c_missing_outside_air_quarantines() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    let mut raw = complete_reading("EQ1", "08:00");
    raw.outside_air_temp = None;

    let outcome = ctx.ingest.ingest_reading(raw, "USER1").await.unwrap();
    let IngestOutcome::Quarantined(q) = outcome else {
        panic!("缺室外温度应隔离");
    };

    // 可得清单字段已拷贝,失败字段已记录
    assert_eq!(q.cond_inlet_temp, Some(85.0));
    assert_eq!(q.run_hours, Some(1200.0));
    assert_eq!(q.outside_air_temp, None);
    assert_eq!(q.invalid_fields, vec!["outside_air_temp".to_string()]);

    // 零条 ComputedLog + 一条隔离 + 一条 BAD_READING 事件
    assert!(ctx.repos.log_repo.list_by_equipment("EQ1").unwrap().is_empty());
    assert_eq!(
        ctx.repos.quarantine_repo.list_by_equipment("EQ1").unwrap().len(),
        1
    );
    let events = ctx.repos.timeline_repo.list_by_equipment("EQ1").unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, TimelineKind::BadReading);
}

#[tokio::test]
async fn test_nan_field_quarantines() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    let mut raw = complete_reading("EQ1", "08:00");
    raw.run_hours = Some(f64::NAN);

    let outcome = ctx.ingest.ingest_reading(raw, "USER1").await.unwrap();
    let IngestOutcome::Quarantined(q) = outcome else {
        panic!("NaN 字段应隔离");
    };
    assert_eq!(q.invalid_fields, vec!["run_hours".to_string()]);
}

#[tokio::test]
async fn test_invalid_local_time_quarantines() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    let mut raw = complete_reading("EQ1", "08:00");
    raw.local_time = "25:61".to_string();

    let outcome = ctx.ingest.ingest_reading(raw, "USER1").await.unwrap();
    let IngestOutcome::Quarantined(q) = outcome else {
        panic!("非法本地时间应隔离");
    };
    assert!(q.invalid_fields.contains(&"ts_utc".to_string()));
    assert_eq!(q.ts_utc, None);
}

// ==========================================
// 运行小时连续性
// ==========================================

#[tokio::test]
async fn test_run_hours_continuity_chaining() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    let mut first = complete_reading("EQ1", "08:00");
    first.run_hours = Some(1000.0);
    let IngestOutcome::Committed(first_log) =
        ctx.ingest.ingest_reading(first, "USER1").await.unwrap()
    else {
        panic!("应为提交结果");
    };

    let mut second = complete_reading("EQ1", "12:00");
    second.run_hours = Some(1004.0);
    let IngestOutcome::Committed(second_log) =
        ctx.ingest.ingest_reading(second, "USER1").await.unwrap()
    else {
        panic!("应为提交结果");
    };

    // 后一条链到前一条的运行小时
    assert_eq!(second_log.last_run_hours, Some(1000.0));
    assert_eq!(second_log.last_run_hours_ts, Some(first_log.ts_utc));
    assert_eq!(second_log.next_run_hours, None);
    assert!(second_log.metrics.run_hours_valid);
}

#[tokio::test]
async fn test_run_hours_regression_flagged_invalid() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    let mut first = complete_reading("EQ1", "08:00");
    first.run_hours = Some(1000.0);
    ctx.ingest.ingest_reading(first, "USER1").await.unwrap();

    // 运行小时倒退 → 标志无效,但仍提交
    let mut second = complete_reading("EQ1", "12:00");
    second.run_hours = Some(900.0);
    let IngestOutcome::Committed(second_log) =
        ctx.ingest.ingest_reading(second, "USER1").await.unwrap()
    else {
        panic!("应为提交结果");
    };
    assert!(!second_log.metrics.run_hours_valid);

    // 无效日志不再被后续读数当作邻居
    let mut third = complete_reading("EQ1", "16:00");
    third.run_hours = Some(1008.0);
    let IngestOutcome::Committed(third_log) =
        ctx.ingest.ingest_reading(third, "USER1").await.unwrap()
    else {
        panic!("应为提交结果");
    };
    assert_eq!(third_log.last_run_hours, Some(1000.0));
}

// ==========================================
// 本地环境不评估告警
// ==========================================

#[tokio::test]
async fn test_local_environment_skips_alert_evaluation() {
    let ctx = build_pipeline(Environment::Local);
    seed_equipment(&ctx, &default_profile("EQ1"));

    ctx.ingest
        .ingest_reading(complete_reading("EQ1", "08:00"), "USER1")
        .await
        .unwrap();
    assert!(ctx.sent.lock().unwrap().is_empty());
}
