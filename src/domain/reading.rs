// ==========================================
// 冷水机组能效监测系统 - 读数领域模型
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 1. 读数归一化
// 职责: 原始读数(瞬态输入) / 归一化读数 / 编辑补丁
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// RawReading - 原始读数
// ==========================================
// 瞬态输入: 每次摄取调用(手工或批量导入行)构造一次
// 数值字段为 Option<f64>: None 表示缺失,NaN 表示非数值输入
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawReading {
    // ===== 标识 =====
    pub equipment_id: String, // 设备ID

    // ===== 本地时间(去重键原料) =====
    pub local_date: String, // 本地日期 YYYY-MM-DD
    pub local_time: String, // 本地时间 HH:MM
    pub utc_offset: String, // UTC偏移 +08:00 / -05:00

    // ===== 温度 =====
    pub cond_inlet_temp: Option<f64>,  // 冷凝器进水温度
    pub cond_outlet_temp: Option<f64>, // 冷凝器出水温度
    pub evap_inlet_temp: Option<f64>,  // 蒸发器进水温度
    pub evap_outlet_temp: Option<f64>, // 蒸发器出水温度
    pub outside_air_temp: Option<f64>, // 室外空气温度
    pub bearing_temp: Option<f64>,     // 轴承温度(无传感器的机组归零)
    pub cond_refrig_temp: Option<f64>, // 冷凝器制冷剂温度(直读,可缺)
    pub evap_refrig_temp: Option<f64>, // 蒸发器制冷剂温度(直读,可缺)

    // ===== 压力 =====
    pub cond_pressure: Option<f64>, // 冷凝器压力
    pub evap_pressure: Option<f64>, // 蒸发器压力

    // ===== 电气 =====
    pub amps_phase1: Option<f64>,  // 1相电流
    pub amps_phase2: Option<f64>,  // 2相电流
    pub amps_phase3: Option<f64>,  // 3相电流
    pub volts_phase1: Option<f64>, // 1相电压
    pub volts_phase2: Option<f64>, // 2相电压
    pub volts_phase3: Option<f64>, // 3相电压
    pub percent_load: Option<f64>, // 负载百分比(PERCENT_LOAD 接线模式)

    // ===== 油系统 =====
    pub oil_pressure_high: Option<f64>, // 油压高端
    pub oil_pressure_low: Option<f64>,  // 油压低端
    pub oil_pressure_diff: Option<f64>, // 油压差(直读)

    // ===== 运行 =====
    pub run_hours: Option<f64>,          // 累计运行小时
    pub purge_minutes: Option<f64>,      // 抽气时间(分钟表直读)
    pub purge_hours_part: Option<f64>,   // 抽气小时部分(时+分表)
    pub purge_minutes_part: Option<f64>, // 抽气分钟部分(时+分表)

    // ===== 备注 =====
    pub notes: Option<String>, // 操作员备注(清单必填,空串视为已填)
}

// ==========================================
// NormalizedReading - 归一化读数
// ==========================================
// 归一化器输出: 与无关输入完全无关的确定字段集
// 未用到的模式字段已按接线/油压/轴承模式归零
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedReading {
    pub equipment_id: String,

    // 本地时间原样保留(更新路径重新归一化时需要)
    pub local_date: String,
    pub local_time: String,
    pub utc_offset: String,

    /// 规范 UTC 时间戳(去重键);本地时间非法时为 None,由校验清单拦截
    pub ts_utc: Option<DateTime<Utc>>,

    pub cond_inlet_temp: Option<f64>,
    pub cond_outlet_temp: Option<f64>,
    pub evap_inlet_temp: Option<f64>,
    pub evap_outlet_temp: Option<f64>,
    pub outside_air_temp: Option<f64>,
    pub bearing_temp: Option<f64>,
    pub cond_refrig_temp: Option<f64>,
    pub evap_refrig_temp: Option<f64>,

    pub cond_pressure: Option<f64>,
    pub evap_pressure: Option<f64>,

    pub amps_phase1: Option<f64>,
    pub amps_phase2: Option<f64>,
    pub amps_phase3: Option<f64>,
    pub volts_phase1: Option<f64>,
    pub volts_phase2: Option<f64>,
    pub volts_phase3: Option<f64>,
    pub percent_load: Option<f64>,

    pub oil_pressure_high: Option<f64>,
    pub oil_pressure_low: Option<f64>,
    pub oil_pressure_diff: Option<f64>,

    pub run_hours: Option<f64>,
    /// 抽气分钟数(模式分支后必有值,非数值按0)
    pub purge_minutes: Option<f64>,

    pub notes: Option<String>,
}

// ==========================================
// ReadingPatch - 编辑补丁
// ==========================================
// 更新路径: Some(v) 覆盖存量字段,None 保持不变
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReadingPatch {
    pub local_date: Option<String>,
    pub local_time: Option<String>,
    pub utc_offset: Option<String>,

    pub cond_inlet_temp: Option<f64>,
    pub cond_outlet_temp: Option<f64>,
    pub evap_inlet_temp: Option<f64>,
    pub evap_outlet_temp: Option<f64>,
    pub outside_air_temp: Option<f64>,
    pub bearing_temp: Option<f64>,
    pub cond_refrig_temp: Option<f64>,
    pub evap_refrig_temp: Option<f64>,

    pub cond_pressure: Option<f64>,
    pub evap_pressure: Option<f64>,

    pub amps_phase1: Option<f64>,
    pub amps_phase2: Option<f64>,
    pub amps_phase3: Option<f64>,
    pub volts_phase1: Option<f64>,
    pub volts_phase2: Option<f64>,
    pub volts_phase3: Option<f64>,
    pub percent_load: Option<f64>,

    pub oil_pressure_high: Option<f64>,
    pub oil_pressure_low: Option<f64>,
    pub oil_pressure_diff: Option<f64>,

    pub run_hours: Option<f64>,
    pub purge_minutes: Option<f64>,
    pub purge_hours_part: Option<f64>,
    pub purge_minutes_part: Option<f64>,

    pub notes: Option<String>,
}
