// ==========================================
// 冷水机组能效监测系统 - 隔离读数领域模型
// ==========================================
// 红线: 隔离记录不可变,补救属人工流程,不自动升级
// ==========================================

use crate::domain::reading::NormalizedReading;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// QuarantinedReading - 隔离读数
// ==========================================
// 未通过校验清单的读数: 仅保留清单字段 + 标识 + 失败原因
// 一次隔离恰好伴随一条 BAD_READING 时间线事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarantinedReading {
    pub quarantine_id: String,
    pub equipment_id: String,
    pub actor_id: String,

    // 本地时间原样保留(规范时间戳可能正是缺失项)
    pub local_date: String,
    pub local_time: String,
    pub utc_offset: String,
    pub ts_utc: Option<DateTime<Utc>>,

    // ===== 清单字段(按可得性拷贝) =====
    pub cond_inlet_temp: Option<f64>,
    pub cond_outlet_temp: Option<f64>,
    pub evap_inlet_temp: Option<f64>,
    pub evap_outlet_temp: Option<f64>,
    pub outside_air_temp: Option<f64>,
    pub cond_pressure: Option<f64>,
    pub evap_pressure: Option<f64>,
    pub amps_phase1: Option<f64>,
    pub amps_phase2: Option<f64>,
    pub amps_phase3: Option<f64>,
    pub volts_phase1: Option<f64>,
    pub volts_phase2: Option<f64>,
    pub volts_phase3: Option<f64>,
    pub oil_pressure_high: Option<f64>,
    pub oil_pressure_low: Option<f64>,
    pub oil_pressure_diff: Option<f64>,
    pub run_hours: Option<f64>,
    pub purge_minutes: Option<f64>,
    pub notes: Option<String>,

    /// 未通过校验的字段名列表
    pub invalid_fields: Vec<String>,

    pub created_at: DateTime<Utc>,
}

impl QuarantinedReading {
    /// 由归一化读数构造隔离记录
    pub fn from_normalized(
        quarantine_id: String,
        normalized: &NormalizedReading,
        actor_id: String,
        invalid_fields: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            quarantine_id,
            equipment_id: normalized.equipment_id.clone(),
            actor_id,
            local_date: normalized.local_date.clone(),
            local_time: normalized.local_time.clone(),
            utc_offset: normalized.utc_offset.clone(),
            ts_utc: normalized.ts_utc,
            cond_inlet_temp: normalized.cond_inlet_temp,
            cond_outlet_temp: normalized.cond_outlet_temp,
            evap_inlet_temp: normalized.evap_inlet_temp,
            evap_outlet_temp: normalized.evap_outlet_temp,
            outside_air_temp: normalized.outside_air_temp,
            cond_pressure: normalized.cond_pressure,
            evap_pressure: normalized.evap_pressure,
            amps_phase1: normalized.amps_phase1,
            amps_phase2: normalized.amps_phase2,
            amps_phase3: normalized.amps_phase3,
            volts_phase1: normalized.volts_phase1,
            volts_phase2: normalized.volts_phase2,
            volts_phase3: normalized.volts_phase3,
            oil_pressure_high: normalized.oil_pressure_high,
            oil_pressure_low: normalized.oil_pressure_low,
            oil_pressure_diff: normalized.oil_pressure_diff,
            run_hours: normalized.run_hours,
            purge_minutes: normalized.purge_minutes,
            notes: normalized.notes.clone(),
            invalid_fields,
            created_at: now,
        }
    }
}
