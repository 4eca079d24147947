// ==========================================
// 冷水机组能效监测系统 - 计算日志仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// 红线: 去重键 (equipment_id, ts_utc) 由部分唯一索引兜底
// ==========================================

use crate::domain::computed_log::{ComputedLog, DerivedMetrics};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::util::{json_column_err, opt_ts_from_str, opt_ts_to_str, ts_from_str, ts_to_str};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// RunHourNeighbor - 连续性邻居查询结果
// ==========================================
#[derive(Debug, Clone)]
pub struct RunHourNeighbor {
    pub run_hours: f64,
    pub ts_utc: DateTime<Utc>,
}

// ==========================================
// ComputedLogRepository - 计算日志仓储
// ==========================================
pub struct ComputedLogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ComputedLogRepository {
    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入计算日志(单次写入,完整行)
    ///
    /// # 返回
    /// - Ok(log_id): 成功插入
    /// - Err(UniqueConstraintViolation): 去重键冲突(并发竞态兜底)
    pub fn insert(&self, log: &ComputedLog) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let metrics_json = serde_json::to_string(&log.metrics)?;

        conn.execute(
            r#"
            INSERT INTO computed_log (
                log_id, equipment_id, facility_id, company_id, actor_id,
                local_date, local_time, utc_offset, ts_utc,
                cond_inlet_temp, cond_outlet_temp, evap_inlet_temp, evap_outlet_temp,
                outside_air_temp, bearing_temp, cond_refrig_temp, evap_refrig_temp,
                cond_pressure, evap_pressure,
                amps_phase1, amps_phase2, amps_phase3,
                volts_phase1, volts_phase2, volts_phase3, percent_load,
                oil_pressure_high, oil_pressure_low, oil_pressure_diff,
                run_hours, purge_minutes, notes,
                last_run_hours, last_run_hours_ts, next_run_hours, next_run_hours_ts,
                run_hours_valid, metrics_json, deleted, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20,
                ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30,
                ?31, ?32, ?33, ?34, ?35, ?36, ?37, ?38, ?39, ?40, ?41
            )
            "#,
            params![
                log.log_id,
                log.equipment_id,
                log.facility_id,
                log.company_id,
                log.actor_id,
                log.local_date,
                log.local_time,
                log.utc_offset,
                ts_to_str(&log.ts_utc),
                log.cond_inlet_temp,
                log.cond_outlet_temp,
                log.evap_inlet_temp,
                log.evap_outlet_temp,
                log.outside_air_temp,
                log.bearing_temp,
                log.cond_refrig_temp,
                log.evap_refrig_temp,
                log.cond_pressure,
                log.evap_pressure,
                log.amps_phase1,
                log.amps_phase2,
                log.amps_phase3,
                log.volts_phase1,
                log.volts_phase2,
                log.volts_phase3,
                log.percent_load,
                log.oil_pressure_high,
                log.oil_pressure_low,
                log.oil_pressure_diff,
                log.run_hours,
                log.purge_minutes,
                log.notes,
                log.last_run_hours,
                opt_ts_to_str(&log.last_run_hours_ts),
                log.next_run_hours,
                opt_ts_to_str(&log.next_run_hours_ts),
                log.metrics.run_hours_valid as i32,
                metrics_json,
                log.deleted as i32,
                ts_to_str(&log.created_at),
                ts_to_str(&log.updated_at),
            ],
        )?;

        Ok(log.log_id.clone())
    }

    /// 整行更新(更新路径的单次写入)
    pub fn update(&self, log: &ComputedLog) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let metrics_json = serde_json::to_string(&log.metrics)?;

        let rows = conn.execute(
            r#"
            UPDATE computed_log SET
                equipment_id = ?2, facility_id = ?3, company_id = ?4, actor_id = ?5,
                local_date = ?6, local_time = ?7, utc_offset = ?8, ts_utc = ?9,
                cond_inlet_temp = ?10, cond_outlet_temp = ?11,
                evap_inlet_temp = ?12, evap_outlet_temp = ?13,
                outside_air_temp = ?14, bearing_temp = ?15,
                cond_refrig_temp = ?16, evap_refrig_temp = ?17,
                cond_pressure = ?18, evap_pressure = ?19,
                amps_phase1 = ?20, amps_phase2 = ?21, amps_phase3 = ?22,
                volts_phase1 = ?23, volts_phase2 = ?24, volts_phase3 = ?25,
                percent_load = ?26,
                oil_pressure_high = ?27, oil_pressure_low = ?28, oil_pressure_diff = ?29,
                run_hours = ?30, purge_minutes = ?31, notes = ?32,
                last_run_hours = ?33, last_run_hours_ts = ?34,
                next_run_hours = ?35, next_run_hours_ts = ?36,
                run_hours_valid = ?37, metrics_json = ?38,
                deleted = ?39, updated_at = ?40
            WHERE log_id = ?1
            "#,
            params![
                log.log_id,
                log.equipment_id,
                log.facility_id,
                log.company_id,
                log.actor_id,
                log.local_date,
                log.local_time,
                log.utc_offset,
                ts_to_str(&log.ts_utc),
                log.cond_inlet_temp,
                log.cond_outlet_temp,
                log.evap_inlet_temp,
                log.evap_outlet_temp,
                log.outside_air_temp,
                log.bearing_temp,
                log.cond_refrig_temp,
                log.evap_refrig_temp,
                log.cond_pressure,
                log.evap_pressure,
                log.amps_phase1,
                log.amps_phase2,
                log.amps_phase3,
                log.volts_phase1,
                log.volts_phase2,
                log.volts_phase3,
                log.percent_load,
                log.oil_pressure_high,
                log.oil_pressure_low,
                log.oil_pressure_diff,
                log.run_hours,
                log.purge_minutes,
                log.notes,
                log.last_run_hours,
                opt_ts_to_str(&log.last_run_hours_ts),
                log.next_run_hours,
                opt_ts_to_str(&log.next_run_hours_ts),
                log.metrics.run_hours_valid as i32,
                metrics_json,
                log.deleted as i32,
                ts_to_str(&log.updated_at),
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ComputedLog".to_string(),
                id: log.log_id.clone(),
            });
        }
        Ok(())
    }

    /// 软删除(置标志,从不物理删除)
    pub fn soft_delete(&self, log_id: &str, now: DateTime<Utc>) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE computed_log SET deleted = 1, updated_at = ?2 WHERE log_id = ?1",
            params![log_id, ts_to_str(&now)],
        )?;
        if rows == 0 {
            return Err(RepositoryError::NotFound {
                entity: "ComputedLog".to_string(),
                id: log_id.to_string(),
            });
        }
        Ok(())
    }

    // ==========================================
    // 查询操作
    // ==========================================

    /// 按 log_id 查询(含已删除)
    pub fn find_by_id(&self, log_id: &str) -> RepositoryResult<Option<ComputedLog>> {
        let conn = self.get_conn()?;
        let log = conn
            .query_row(
                &format!("SELECT {} FROM computed_log WHERE log_id = ?1", Self::COLUMNS),
                params![log_id],
                Self::map_row,
            )
            .optional()?;
        Ok(log)
    }

    /// 去重检查: 指定键是否已有非删除记录
    ///
    /// # 参数
    /// - exclude_id: 更新路径排除记录自身
    ///
    /// # 返回
    /// - Ok(Some(log_id)): 键已被占用
    pub fn find_duplicate(
        &self,
        equipment_id: &str,
        ts_utc: &DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let hit = conn
            .query_row(
                r#"
                SELECT log_id FROM computed_log
                WHERE equipment_id = ?1 AND ts_utc = ?2 AND deleted = 0
                  AND (?3 IS NULL OR log_id != ?3)
                LIMIT 1
                "#,
                params![equipment_id, ts_to_str(ts_utc), exclude_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(hit)
    }

    /// 时间上最近的前一条可用日志(运行小时连续性)
    ///
    /// 口径: 已提交、非删除、运行小时有效标志未被置否
    pub fn find_nearest_prior(
        &self,
        equipment_id: &str,
        ts_utc: &DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> RepositoryResult<Option<RunHourNeighbor>> {
        self.find_neighbor(equipment_id, ts_utc, exclude_id, "<", "DESC")
    }

    /// 时间上最近的后一条可用日志
    pub fn find_nearest_next(
        &self,
        equipment_id: &str,
        ts_utc: &DateTime<Utc>,
        exclude_id: Option<&str>,
    ) -> RepositoryResult<Option<RunHourNeighbor>> {
        self.find_neighbor(equipment_id, ts_utc, exclude_id, ">", "ASC")
    }

    fn find_neighbor(
        &self,
        equipment_id: &str,
        ts_utc: &DateTime<Utc>,
        exclude_id: Option<&str>,
        cmp: &str,
        order: &str,
    ) -> RepositoryResult<Option<RunHourNeighbor>> {
        let conn = self.get_conn()?;
        let sql = format!(
            r#"
            SELECT run_hours, ts_utc FROM computed_log
            WHERE equipment_id = ?1 AND ts_utc {cmp} ?2
              AND deleted = 0 AND run_hours_valid = 1
              AND (?3 IS NULL OR log_id != ?3)
            ORDER BY ts_utc {order}
            LIMIT 1
            "#
        );
        let neighbor = conn
            .query_row(
                &sql,
                params![equipment_id, ts_to_str(ts_utc), exclude_id],
                |row| {
                    let run_hours: f64 = row.get(0)?;
                    let ts_raw: String = row.get(1)?;
                    Ok((run_hours, ts_raw))
                },
            )
            .optional()?;
        Ok(neighbor.and_then(|(run_hours, ts_raw)| {
            ts_from_str(&ts_raw).map(|ts_utc| RunHourNeighbor { run_hours, ts_utc })
        }))
    }

    /// 按设备列出非删除日志(时间升序)
    pub fn list_by_equipment(&self, equipment_id: &str) -> RepositoryResult<Vec<ComputedLog>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM computed_log WHERE equipment_id = ?1 AND deleted = 0 ORDER BY ts_utc ASC",
            Self::COLUMNS
        ))?;
        let logs = stmt
            .query_map(params![equipment_id], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    // ==========================================
    // 行映射
    // ==========================================

    const COLUMNS: &'static str = r#"
        log_id, equipment_id, facility_id, company_id, actor_id,
        local_date, local_time, utc_offset, ts_utc,
        cond_inlet_temp, cond_outlet_temp, evap_inlet_temp, evap_outlet_temp,
        outside_air_temp, bearing_temp, cond_refrig_temp, evap_refrig_temp,
        cond_pressure, evap_pressure,
        amps_phase1, amps_phase2, amps_phase3,
        volts_phase1, volts_phase2, volts_phase3, percent_load,
        oil_pressure_high, oil_pressure_low, oil_pressure_diff,
        run_hours, purge_minutes, notes,
        last_run_hours, last_run_hours_ts, next_run_hours, next_run_hours_ts,
        metrics_json, deleted, created_at, updated_at
    "#;

    fn map_row(row: &Row<'_>) -> rusqlite::Result<ComputedLog> {
        let ts_raw: String = row.get(8)?;
        let metrics_raw: String = row.get(36)?;
        let metrics: DerivedMetrics =
            serde_json::from_str(&metrics_raw).map_err(json_column_err)?;
        let created_raw: String = row.get(38)?;
        let updated_raw: String = row.get(39)?;

        Ok(ComputedLog {
            log_id: row.get(0)?,
            equipment_id: row.get(1)?,
            facility_id: row.get(2)?,
            company_id: row.get(3)?,
            actor_id: row.get(4)?,
            local_date: row.get(5)?,
            local_time: row.get(6)?,
            utc_offset: row.get(7)?,
            ts_utc: ts_from_str(&ts_raw).unwrap_or_default(),
            cond_inlet_temp: row.get(9)?,
            cond_outlet_temp: row.get(10)?,
            evap_inlet_temp: row.get(11)?,
            evap_outlet_temp: row.get(12)?,
            outside_air_temp: row.get(13)?,
            bearing_temp: row.get(14)?,
            cond_refrig_temp: row.get(15)?,
            evap_refrig_temp: row.get(16)?,
            cond_pressure: row.get(17)?,
            evap_pressure: row.get(18)?,
            amps_phase1: row.get(19)?,
            amps_phase2: row.get(20)?,
            amps_phase3: row.get(21)?,
            volts_phase1: row.get(22)?,
            volts_phase2: row.get(23)?,
            volts_phase3: row.get(24)?,
            percent_load: row.get(25)?,
            oil_pressure_high: row.get(26)?,
            oil_pressure_low: row.get(27)?,
            oil_pressure_diff: row.get(28)?,
            run_hours: row.get(29)?,
            purge_minutes: row.get(30)?,
            notes: row.get(31)?,
            last_run_hours: row.get(32)?,
            last_run_hours_ts: opt_ts_from_str(row.get(33)?),
            next_run_hours: row.get(34)?,
            next_run_hours_ts: opt_ts_from_str(row.get(35)?),
            metrics,
            deleted: row.get::<_, i32>(37)? != 0,
            created_at: ts_from_str(&created_raw).unwrap_or_default(),
            updated_at: ts_from_str(&updated_raw).unwrap_or_default(),
        })
    }
}
