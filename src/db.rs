// ==========================================
// 冷水机组能效监测系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为，避免“部分模块外键开启/部分不开启”
// - 统一 busy_timeout，减少并发写入时的偶发 busy 错误
// - (equipment_id, ts_utc) 非删除记录的部分唯一索引,把去重竞态收敛为约束冲突
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要“每个连接”单独开启
/// - busy_timeout 需要“每个连接”单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化数据库 schema（幂等,CREATE IF NOT EXISTS）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        -- 设备档案
        CREATE TABLE IF NOT EXISTS equipment_profile (
            equipment_id TEXT PRIMARY KEY,
            serial_no TEXT NOT NULL,
            equipment_no TEXT NOT NULL,
            name TEXT NOT NULL,
            facility_id TEXT NOT NULL,
            company_id TEXT NOT NULL,
            wiring_mode TEXT NOT NULL,
            oil_pressure_mode TEXT NOT NULL,
            purge_unit_mode TEXT NOT NULL,
            has_bearing_temp INTEGER NOT NULL DEFAULT 0,
            unit_system TEXT NOT NULL,
            refrigerant TEXT NOT NULL,
            pressure_class TEXT NOT NULL,
            run_hours_logged INTEGER NOT NULL DEFAULT 1,
            compressor_count INTEGER NOT NULL DEFAULT 1,
            design_json TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_equipment_natural
            ON equipment_profile(serial_no, equipment_no);

        -- 设施
        CREATE TABLE IF NOT EXISTS facility (
            facility_id TEXT PRIMARY KEY,
            company_id TEXT NOT NULL,
            name TEXT NOT NULL,
            altitude REAL NOT NULL DEFAULT 0
        );

        -- 用户账号(告警资格载体)
        CREATE TABLE IF NOT EXISTS user_account (
            user_id TEXT PRIMARY KEY,
            company_id TEXT NOT NULL,
            email TEXT NOT NULL,
            role_scope TEXT NOT NULL,
            facility_ids_json TEXT NOT NULL DEFAULT '[]',
            equipment_ids_json TEXT NOT NULL DEFAULT '[]'
        );
        CREATE INDEX IF NOT EXISTS idx_user_company ON user_account(company_id);

        -- 告警规则
        CREATE TABLE IF NOT EXISTS alert_rule (
            rule_id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES user_account(user_id),
            metric TEXT NOT NULL,
            warning_op TEXT,
            warning_threshold REAL,
            alert_op TEXT,
            alert_threshold REAL,
            channel TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_rule_user ON alert_rule(user_id);

        -- 计算日志(已提交读数)
        CREATE TABLE IF NOT EXISTS computed_log (
            log_id TEXT PRIMARY KEY,
            equipment_id TEXT NOT NULL,
            facility_id TEXT NOT NULL,
            company_id TEXT NOT NULL,
            actor_id TEXT NOT NULL,
            local_date TEXT NOT NULL,
            local_time TEXT NOT NULL,
            utc_offset TEXT NOT NULL,
            ts_utc TEXT NOT NULL,
            cond_inlet_temp REAL NOT NULL,
            cond_outlet_temp REAL NOT NULL,
            evap_inlet_temp REAL NOT NULL,
            evap_outlet_temp REAL NOT NULL,
            outside_air_temp REAL NOT NULL,
            bearing_temp REAL NOT NULL,
            cond_refrig_temp REAL,
            evap_refrig_temp REAL,
            cond_pressure REAL NOT NULL,
            evap_pressure REAL NOT NULL,
            amps_phase1 REAL NOT NULL,
            amps_phase2 REAL NOT NULL,
            amps_phase3 REAL NOT NULL,
            volts_phase1 REAL NOT NULL,
            volts_phase2 REAL NOT NULL,
            volts_phase3 REAL NOT NULL,
            percent_load REAL,
            oil_pressure_high REAL NOT NULL,
            oil_pressure_low REAL NOT NULL,
            oil_pressure_diff REAL NOT NULL,
            run_hours REAL NOT NULL,
            purge_minutes REAL NOT NULL,
            notes TEXT NOT NULL,
            last_run_hours REAL,
            last_run_hours_ts TEXT,
            next_run_hours REAL,
            next_run_hours_ts TEXT,
            run_hours_valid INTEGER NOT NULL DEFAULT 1,
            metrics_json TEXT NOT NULL,
            deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        -- 去重键硬化: 非删除记录 (equipment_id, ts_utc) 唯一
        CREATE UNIQUE INDEX IF NOT EXISTS idx_computed_log_dedup
            ON computed_log(equipment_id, ts_utc) WHERE deleted = 0;
        CREATE INDEX IF NOT EXISTS idx_computed_log_equipment_ts
            ON computed_log(equipment_id, ts_utc);

        -- 隔离读数(不可变)
        CREATE TABLE IF NOT EXISTS quarantined_reading (
            quarantine_id TEXT PRIMARY KEY,
            equipment_id TEXT NOT NULL,
            actor_id TEXT NOT NULL,
            local_date TEXT NOT NULL,
            local_time TEXT NOT NULL,
            utc_offset TEXT NOT NULL,
            ts_utc TEXT,
            cond_inlet_temp REAL,
            cond_outlet_temp REAL,
            evap_inlet_temp REAL,
            evap_outlet_temp REAL,
            outside_air_temp REAL,
            cond_pressure REAL,
            evap_pressure REAL,
            amps_phase1 REAL,
            amps_phase2 REAL,
            amps_phase3 REAL,
            volts_phase1 REAL,
            volts_phase2 REAL,
            volts_phase3 REAL,
            oil_pressure_high REAL,
            oil_pressure_low REAL,
            oil_pressure_diff REAL,
            run_hours REAL,
            purge_minutes REAL,
            notes TEXT,
            invalid_fields_json TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_quarantine_equipment
            ON quarantined_reading(equipment_id);

        -- 时间线事件(仅追加)
        CREATE TABLE IF NOT EXISTS timeline_event (
            event_id TEXT PRIMARY KEY,
            equipment_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            description TEXT NOT NULL,
            actor_id TEXT NOT NULL,
            reading_ts TEXT,
            original_created_at TEXT,
            edited_at TEXT,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_timeline_equipment
            ON timeline_event(equipment_id, created_at);
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap(); // 二次执行不报错
    }

    #[test]
    fn test_dedup_index_rejects_duplicate_key() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let insert = |id: &str, deleted: i32| {
            conn.execute(
                r#"
                INSERT INTO computed_log (
                    log_id, equipment_id, facility_id, company_id, actor_id,
                    local_date, local_time, utc_offset, ts_utc,
                    cond_inlet_temp, cond_outlet_temp, evap_inlet_temp, evap_outlet_temp,
                    outside_air_temp, bearing_temp, cond_pressure, evap_pressure,
                    amps_phase1, amps_phase2, amps_phase3,
                    volts_phase1, volts_phase2, volts_phase3,
                    oil_pressure_high, oil_pressure_low, oil_pressure_diff,
                    run_hours, purge_minutes, notes, run_hours_valid,
                    metrics_json, deleted, created_at, updated_at
                ) VALUES (
                    ?1, 'EQ1', 'FAC1', 'CO1', 'U1',
                    '2026-03-01', '08:00', '+08:00', '2026-03-01T00:00:00+00:00',
                    0, 0, 0, 0, 0, 0, 0, 0,
                    0, 0, 0, 0, 0, 0, 0, 0, 0,
                    0, 0, '', 1, '{}', ?2,
                    '2026-03-01T00:00:00+00:00', '2026-03-01T00:00:00+00:00'
                )
                "#,
                rusqlite::params![id, deleted],
            )
        };

        insert("L1", 0).unwrap();
        // 同键非删除记录被唯一索引拒绝
        assert!(insert("L2", 0).is_err());
        // 软删除记录不占用去重键
        insert("L3", 1).unwrap();
    }
}
