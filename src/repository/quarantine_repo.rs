// ==========================================
// 冷水机组能效监测系统 - 隔离读数仓储
// ==========================================
// 红线: 仅插入与查询,隔离记录不可变
// ==========================================

use crate::domain::quarantine::QuarantinedReading;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::{json_column_err, opt_ts_from_str, opt_ts_to_str, ts_from_str, ts_to_str};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// QuarantineRepository - 隔离读数仓储
// ==========================================
pub struct QuarantineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl QuarantineRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入隔离读数
    pub fn insert(&self, reading: &QuarantinedReading) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let invalid_fields_json = serde_json::to_string(&reading.invalid_fields)?;

        conn.execute(
            r#"
            INSERT INTO quarantined_reading (
                quarantine_id, equipment_id, actor_id,
                local_date, local_time, utc_offset, ts_utc,
                cond_inlet_temp, cond_outlet_temp, evap_inlet_temp, evap_outlet_temp,
                outside_air_temp, cond_pressure, evap_pressure,
                amps_phase1, amps_phase2, amps_phase3,
                volts_phase1, volts_phase2, volts_phase3,
                oil_pressure_high, oil_pressure_low, oil_pressure_diff,
                run_hours, purge_minutes, notes,
                invalid_fields_json, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20,
                ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28
            )
            "#,
            params![
                reading.quarantine_id,
                reading.equipment_id,
                reading.actor_id,
                reading.local_date,
                reading.local_time,
                reading.utc_offset,
                opt_ts_to_str(&reading.ts_utc),
                reading.cond_inlet_temp,
                reading.cond_outlet_temp,
                reading.evap_inlet_temp,
                reading.evap_outlet_temp,
                reading.outside_air_temp,
                reading.cond_pressure,
                reading.evap_pressure,
                reading.amps_phase1,
                reading.amps_phase2,
                reading.amps_phase3,
                reading.volts_phase1,
                reading.volts_phase2,
                reading.volts_phase3,
                reading.oil_pressure_high,
                reading.oil_pressure_low,
                reading.oil_pressure_diff,
                reading.run_hours,
                reading.purge_minutes,
                reading.notes,
                invalid_fields_json,
                ts_to_str(&reading.created_at),
            ],
        )?;

        Ok(reading.quarantine_id.clone())
    }

    /// 按 quarantine_id 查询
    pub fn find_by_id(&self, quarantine_id: &str) -> RepositoryResult<Option<QuarantinedReading>> {
        let conn = self.get_conn()?;
        let reading = conn
            .query_row(
                &format!(
                    "SELECT {} FROM quarantined_reading WHERE quarantine_id = ?1",
                    Self::COLUMNS
                ),
                params![quarantine_id],
                Self::map_row,
            )
            .optional()?;
        Ok(reading)
    }

    /// 按设备列出隔离读数(创建时间降序)
    pub fn list_by_equipment(
        &self,
        equipment_id: &str,
    ) -> RepositoryResult<Vec<QuarantinedReading>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM quarantined_reading WHERE equipment_id = ?1 ORDER BY created_at DESC",
            Self::COLUMNS
        ))?;
        let readings = stmt
            .query_map(params![equipment_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(readings)
    }

    const COLUMNS: &'static str = r#"
        quarantine_id, equipment_id, actor_id,
        local_date, local_time, utc_offset, ts_utc,
        cond_inlet_temp, cond_outlet_temp, evap_inlet_temp, evap_outlet_temp,
        outside_air_temp, cond_pressure, evap_pressure,
        amps_phase1, amps_phase2, amps_phase3,
        volts_phase1, volts_phase2, volts_phase3,
        oil_pressure_high, oil_pressure_low, oil_pressure_diff,
        run_hours, purge_minutes, notes,
        invalid_fields_json, created_at
    "#;

    fn map_row(row: &Row<'_>) -> rusqlite::Result<QuarantinedReading> {
        let invalid_raw: String = row.get(26)?;
        let invalid_fields: Vec<String> =
            serde_json::from_str(&invalid_raw).map_err(json_column_err)?;
        let created_raw: String = row.get(27)?;

        Ok(QuarantinedReading {
            quarantine_id: row.get(0)?,
            equipment_id: row.get(1)?,
            actor_id: row.get(2)?,
            local_date: row.get(3)?,
            local_time: row.get(4)?,
            utc_offset: row.get(5)?,
            ts_utc: opt_ts_from_str(row.get(6)?),
            cond_inlet_temp: row.get(7)?,
            cond_outlet_temp: row.get(8)?,
            evap_inlet_temp: row.get(9)?,
            evap_outlet_temp: row.get(10)?,
            outside_air_temp: row.get(11)?,
            cond_pressure: row.get(12)?,
            evap_pressure: row.get(13)?,
            amps_phase1: row.get(14)?,
            amps_phase2: row.get(15)?,
            amps_phase3: row.get(16)?,
            volts_phase1: row.get(17)?,
            volts_phase2: row.get(18)?,
            volts_phase3: row.get(19)?,
            oil_pressure_high: row.get(20)?,
            oil_pressure_low: row.get(21)?,
            oil_pressure_diff: row.get(22)?,
            run_hours: row.get(23)?,
            purge_minutes: row.get(24)?,
            notes: row.get(25)?,
            invalid_fields,
            created_at: ts_from_str(&created_raw).unwrap_or_default(),
        })
    }
}
