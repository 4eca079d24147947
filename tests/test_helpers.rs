// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

use chiller_telemetry::config::{AppConfig, Environment};
use chiller_telemetry::db::{configure_sqlite_connection, init_schema};
use chiller_telemetry::domain::alert::AlertDispatch;
use chiller_telemetry::domain::equipment::{DesignConstants, EquipmentProfile, Facility};
use chiller_telemetry::domain::reading::RawReading;
use chiller_telemetry::domain::types::{
    OilPressureMode, PressureClass, PurgeUnitMode, UnitSystem, WiringMode,
};
use chiller_telemetry::reference::{BuiltinAltitudeTable, BuiltinRefrigerantTable};
use chiller_telemetry::service::{
    AlertEvaluator, IngestRepositories, IngestService, NotificationTransport,
};
use rusqlite::Connection;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 测试上下文: 临时数据库 + 装配好的摄取管线
pub struct TestContext {
    // 临时数据库文件需保持存活
    pub _temp_file: NamedTempFile,
    pub repos: IngestRepositories,
    pub ingest: Arc<IngestService>,
    /// 记录型传输捕获的分发请求
    pub sent: Arc<Mutex<Vec<AlertDispatch>>>,
}

/// 创建临时测试数据库并初始化 schema
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 装配完整摄取管线(记录型传输,可指定运行环境)
pub fn build_pipeline(environment: Environment) -> TestContext {
    let (temp_file, db_path) = create_test_db().expect("创建测试数据库失败");
    let conn = Connection::open(&db_path).expect("打开测试数据库失败");
    configure_sqlite_connection(&conn).expect("连接配置失败");
    let conn = Arc::new(Mutex::new(conn));

    let repos = IngestRepositories::from_connection(conn);
    let sent = Arc::new(Mutex::new(Vec::new()));
    let transport = Arc::new(RecordingTransport { sent: sent.clone() });
    let alert_evaluator = AlertEvaluator::new(repos.alert_rule_repo.clone(), transport);

    let ingest = Arc::new(IngestService::new(
        repos.clone(),
        Arc::new(BuiltinRefrigerantTable::new()),
        Arc::new(BuiltinAltitudeTable::new()),
        alert_evaluator,
        AppConfig::new(db_path, environment),
    ));

    TestContext {
        _temp_file: temp_file,
        repos,
        ingest,
        sent,
    }
}

// ==========================================
// RecordingTransport - 记录型传输
// ==========================================
pub struct RecordingTransport {
    pub sent: Arc<Mutex<Vec<AlertDispatch>>>,
}

#[async_trait::async_trait]
impl NotificationTransport for RecordingTransport {
    async fn send(&self, dispatch: &AlertDispatch) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(dispatch.clone());
        Ok(())
    }
}

// ==========================================
// 测试数据构造器
// ==========================================

/// 缺省设计常数
pub fn design_constants() -> DesignConstants {
    DesignConstants {
        full_load_amps: 120.0,
        design_tons: 500.0,
        design_input_kw: 300.0,
        design_cond_approach: 2.0,
        design_evap_approach: 3.0,
        design_cond_inlet_temp: 85.0,
        design_evap_outlet_temp: 44.0,
        design_cond_delta_t: 10.0,
        design_evap_delta_t: 10.0,
        design_cond_flow: 1200.0,
        design_evap_flow: 960.0,
        annual_run_hours: 4000.0,
        energy_cost_per_kwh: 0.1,
        emission_factor: 0.4,
        cond_loss_coeff: 2.0,
        evap_loss_coeff: 1.5,
        non_cond_loss_coeff: 0.5,
    }
}

/// 缺省设备档案(三相 / 高低油压 / 分钟抽气表 / R-134A 高压)
pub fn default_profile(equipment_id: &str) -> EquipmentProfile {
    EquipmentProfile {
        equipment_id: equipment_id.to_string(),
        serial_no: format!("SN-{}", equipment_id),
        equipment_no: format!("CH-{}", equipment_id),
        name: format!("{}号冷机", equipment_id),
        facility_id: "FAC001".to_string(),
        company_id: "CO001".to_string(),
        wiring_mode: WiringMode::ThreePhase,
        oil_pressure_mode: OilPressureMode::HighLow,
        purge_unit_mode: PurgeUnitMode::MinutesOnly,
        has_bearing_temp: false,
        unit_system: UnitSystem::Imperial,
        refrigerant: "R-134A".to_string(),
        pressure_class: PressureClass::High,
        run_hours_logged: true,
        compressor_count: 1,
        design: design_constants(),
    }
}

/// 缺省设施
pub fn default_facility() -> Facility {
    Facility {
        facility_id: "FAC001".to_string(),
        company_id: "CO001".to_string(),
        name: "一号站房".to_string(),
        altitude: 0.0,
    }
}

/// 播种设施 + 设备档案
pub fn seed_equipment(ctx: &TestContext, profile: &EquipmentProfile) {
    if ctx
        .repos
        .equipment_repo
        .find_facility(&profile.facility_id)
        .expect("设施查询失败")
        .is_none()
    {
        ctx.repos
            .equipment_repo
            .insert_facility(&default_facility())
            .expect("设施播种失败");
    }
    ctx.repos
        .equipment_repo
        .insert_profile(profile)
        .expect("设备档案播种失败");
}

/// 完整有效读数(与 default_profile 的三相/高低油压模式匹配)
pub fn complete_reading(equipment_id: &str, local_time: &str) -> RawReading {
    RawReading {
        equipment_id: equipment_id.to_string(),
        local_date: "2026-03-01".to_string(),
        local_time: local_time.to_string(),
        utc_offset: "+08:00".to_string(),
        cond_inlet_temp: Some(85.0),
        cond_outlet_temp: Some(95.0),
        evap_inlet_temp: Some(54.0),
        evap_outlet_temp: Some(44.0),
        outside_air_temp: Some(90.0),
        bearing_temp: None,
        cond_refrig_temp: Some(97.0),
        evap_refrig_temp: Some(40.0),
        cond_pressure: Some(120.0),
        evap_pressure: Some(35.0),
        amps_phase1: Some(97.0),
        amps_phase2: Some(100.0),
        amps_phase3: Some(103.0),
        volts_phase1: Some(460.0),
        volts_phase2: Some(460.0),
        volts_phase3: Some(460.0),
        percent_load: None,
        oil_pressure_high: Some(45.0),
        oil_pressure_low: Some(27.0),
        oil_pressure_diff: None,
        run_hours: Some(1200.0),
        purge_minutes: Some(5.0),
        purge_hours_part: None,
        purge_minutes_part: None,
        notes: Some("正常".to_string()),
    }
}
