// ==========================================
// 冷水机组能效监测系统 - 油压差与不凝气估算
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 3.8 油压差 / 3.9 不凝气
// 口径: 油压模式分支与归一化器一致
// ==========================================

use crate::domain::types::OilPressureMode;
use crate::engine::round::round4;

/// 最终油压差
///
/// # 规则(与归一化器的模式分支镜像)
/// - HIGH_LOW: 高 - 低
/// - HIGH_ONLY: 高 - 蒸发器压力
/// - DIFFERENTIAL_ONLY: 压差直读
/// - NOT_LOGGED: 0
pub fn final_oil_diff(
    mode: OilPressureMode,
    oil_high: f64,
    oil_low: f64,
    oil_diff: f64,
    evap_pressure: f64,
) -> f64 {
    match mode {
        OilPressureMode::HighLow => round4(oil_high - oil_low),
        OilPressureMode::HighOnly => round4(oil_high - evap_pressure),
        OilPressureMode::DifferentialOnly => round4(oil_diff),
        OilPressureMode::NotLogged => 0.0,
    }
}

/// 不凝气估算 = max(0, 冷凝器实测压力 - 该制冷剂温度下的饱和压力)
///
/// 饱和压力查表失败(未知制冷剂/温度缺失)时按 0 降级
pub fn non_condensables(cond_pressure: f64, sat_pressure: Option<f64>) -> f64 {
    match sat_pressure {
        Some(sp) => round4((cond_pressure - sp).max(0.0)),
        None => 0.0,
    }
}
