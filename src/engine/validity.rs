// ==========================================
// 冷水机组能效监测系统 - 校验清单(有效性闸门)
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 4. 必填字段清单
// 职责: 判定归一化读数提交或隔离;逐字段给出失败原因
// 红线: 无状态纯函数;隔离是终态,不自动升级
// ==========================================

use crate::domain::reading::NormalizedReading;

// ==========================================
// ValidityReport - 校验报告
// ==========================================
#[derive(Debug, Clone)]
pub struct ValidityReport {
    /// 未通过的字段名(空 = 可提交)
    pub invalid_fields: Vec<String>,
}

impl ValidityReport {
    /// 是否可提交为 ComputedLog
    pub fn is_valid(&self) -> bool {
        self.invalid_fields.is_empty()
    }
}

// ==========================================
// ValidityGate - 纯函数工具类
// ==========================================
pub struct ValidityGate;

impl ValidityGate {
    /// 对归一化读数执行必填清单校验
    ///
    /// # 清单
    /// 规范时间戳、全部温度/压力、全部相电流/电压、油系统字段、
    /// 运行小时、抽气时间、备注、室外空气温度
    ///
    /// # 无效判定
    /// 数值字段: 缺失(None) 或 NaN;备注: 缺失(None)
    pub fn check(normalized: &NormalizedReading) -> ValidityReport {
        let mut invalid = Vec::new();

        if normalized.ts_utc.is_none() {
            invalid.push("ts_utc".to_string());
        }

        let numeric_fields: [(&str, Option<f64>); 19] = [
            ("cond_inlet_temp", normalized.cond_inlet_temp),
            ("cond_outlet_temp", normalized.cond_outlet_temp),
            ("evap_inlet_temp", normalized.evap_inlet_temp),
            ("evap_outlet_temp", normalized.evap_outlet_temp),
            ("outside_air_temp", normalized.outside_air_temp),
            ("cond_pressure", normalized.cond_pressure),
            ("evap_pressure", normalized.evap_pressure),
            ("amps_phase1", normalized.amps_phase1),
            ("amps_phase2", normalized.amps_phase2),
            ("amps_phase3", normalized.amps_phase3),
            ("volts_phase1", normalized.volts_phase1),
            ("volts_phase2", normalized.volts_phase2),
            ("volts_phase3", normalized.volts_phase3),
            ("oil_pressure_high", normalized.oil_pressure_high),
            ("oil_pressure_low", normalized.oil_pressure_low),
            ("oil_pressure_diff", normalized.oil_pressure_diff),
            ("run_hours", normalized.run_hours),
            ("purge_minutes", normalized.purge_minutes),
            ("bearing_temp", normalized.bearing_temp),
        ];

        for (name, value) in numeric_fields {
            if !Self::is_numeric(value) {
                invalid.push(name.to_string());
            }
        }

        if normalized.notes.is_none() {
            invalid.push("notes".to_string());
        }

        ValidityReport {
            invalid_fields: invalid,
        }
    }

    /// 数值字段有效: 存在且非 NaN
    fn is_numeric(value: Option<f64>) -> bool {
        matches!(value, Some(v) if !v.is_nan())
    }
}
