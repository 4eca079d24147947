// ==========================================
// 冷水机组能效监测系统 - 设备档案/设施仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// ==========================================

use crate::domain::equipment::{DesignConstants, EquipmentProfile, Facility};
use crate::domain::types::{
    OilPressureMode, PressureClass, PurgeUnitMode, UnitSystem, WiringMode,
};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::json_column_err;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// EquipmentRepository - 设备档案仓储
// ==========================================
pub struct EquipmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EquipmentRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 设备档案
    // ==========================================

    /// 插入设备档案
    pub fn insert_profile(&self, profile: &EquipmentProfile) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO equipment_profile (
                equipment_id, serial_no, equipment_no, name, facility_id, company_id,
                wiring_mode, oil_pressure_mode, purge_unit_mode, has_bearing_temp,
                unit_system, refrigerant, pressure_class, run_hours_logged,
                compressor_count, design_json
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                profile.equipment_id,
                profile.serial_no,
                profile.equipment_no,
                profile.name,
                profile.facility_id,
                profile.company_id,
                profile.wiring_mode.as_str(),
                profile.oil_pressure_mode.as_str(),
                profile.purge_unit_mode.as_str(),
                profile.has_bearing_temp as i32,
                profile.unit_system.as_str(),
                profile.refrigerant,
                profile.pressure_class.as_str(),
                profile.run_hours_logged as i32,
                profile.compressor_count,
                serde_json::to_string(&profile.design)?,
            ],
        )?;
        Ok(profile.equipment_id.clone())
    }

    /// 按 equipment_id 查询档案
    pub fn find_by_id(&self, equipment_id: &str) -> RepositoryResult<Option<EquipmentProfile>> {
        let conn = self.get_conn()?;
        let profile = conn
            .query_row(
                &format!(
                    "SELECT {} FROM equipment_profile WHERE equipment_id = ?1",
                    Self::COLUMNS
                ),
                params![equipment_id],
                Self::map_profile,
            )
            .optional()?;
        Ok(profile)
    }

    /// 按自然键(序列号, 设备编号)解析设备(批量导入行解析)
    pub fn find_by_natural_key(
        &self,
        serial_no: &str,
        equipment_no: &str,
    ) -> RepositoryResult<Option<EquipmentProfile>> {
        let conn = self.get_conn()?;
        let profile = conn
            .query_row(
                &format!(
                    "SELECT {} FROM equipment_profile WHERE serial_no = ?1 AND equipment_no = ?2 LIMIT 1",
                    Self::COLUMNS
                ),
                params![serial_no, equipment_no],
                Self::map_profile,
            )
            .optional()?;
        Ok(profile)
    }

    const COLUMNS: &'static str = r#"
        equipment_id, serial_no, equipment_no, name, facility_id, company_id,
        wiring_mode, oil_pressure_mode, purge_unit_mode, has_bearing_temp,
        unit_system, refrigerant, pressure_class, run_hours_logged,
        compressor_count, design_json
    "#;

    fn map_profile(row: &Row<'_>) -> rusqlite::Result<EquipmentProfile> {
        let wiring_raw: String = row.get(6)?;
        let oil_raw: String = row.get(7)?;
        let purge_raw: String = row.get(8)?;
        let unit_raw: String = row.get(10)?;
        let class_raw: String = row.get(12)?;
        let design_raw: String = row.get(15)?;
        let design: DesignConstants =
            serde_json::from_str(&design_raw).map_err(json_column_err)?;

        Ok(EquipmentProfile {
            equipment_id: row.get(0)?,
            serial_no: row.get(1)?,
            equipment_no: row.get(2)?,
            name: row.get(3)?,
            facility_id: row.get(4)?,
            company_id: row.get(5)?,
            wiring_mode: WiringMode::parse(&wiring_raw).unwrap_or(WiringMode::ThreePhase),
            oil_pressure_mode: OilPressureMode::parse(&oil_raw)
                .unwrap_or(OilPressureMode::NotLogged),
            purge_unit_mode: PurgeUnitMode::parse(&purge_raw)
                .unwrap_or(PurgeUnitMode::MinutesOnly),
            has_bearing_temp: row.get::<_, i32>(9)? != 0,
            unit_system: UnitSystem::parse(&unit_raw).unwrap_or(UnitSystem::Imperial),
            refrigerant: row.get(11)?,
            pressure_class: PressureClass::parse(&class_raw).unwrap_or(PressureClass::High),
            run_hours_logged: row.get::<_, i32>(13)? != 0,
            compressor_count: row.get(14)?,
            design,
        })
    }

    // ==========================================
    // 设施
    // ==========================================

    /// 插入设施
    pub fn insert_facility(&self, facility: &Facility) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO facility (facility_id, company_id, name, altitude) VALUES (?1, ?2, ?3, ?4)",
            params![
                facility.facility_id,
                facility.company_id,
                facility.name,
                facility.altitude,
            ],
        )?;
        Ok(facility.facility_id.clone())
    }

    /// 按 facility_id 查询设施
    pub fn find_facility(&self, facility_id: &str) -> RepositoryResult<Option<Facility>> {
        let conn = self.get_conn()?;
        let facility = conn
            .query_row(
                "SELECT facility_id, company_id, name, altitude FROM facility WHERE facility_id = ?1",
                params![facility_id],
                |row| {
                    Ok(Facility {
                        facility_id: row.get(0)?,
                        company_id: row.get(1)?,
                        name: row.get(2)?,
                        altitude: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(facility)
    }
}
