// ==========================================
// 冷水机组能效监测系统 - 流量估算
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 3.5 流量估算
// 口径: GPM = 冷吨 × 热量系数 ÷ 温差(蒸发 24 / 冷凝 30)
// ==========================================

use crate::engine::round::round4;

/// 蒸发器流量估算 = 设计冷吨 × 负载率/100 × 24 ÷ 蒸发器温差
///
/// 温差非正(水温倒挂或零温差)时返回 0
pub fn evap_flow_est(design_tons: f64, load_factor: f64, evap_delta_t: f64) -> f64 {
    if evap_delta_t <= 0.0 {
        return 0.0;
    }
    round4(design_tons * load_factor / 100.0 * 24.0 / evap_delta_t)
}

/// 冷凝器流量估算 = 设计冷吨 × 负载率/100 × 30 ÷ 冷凝器温差
pub fn cond_flow_est(design_tons: f64, load_factor: f64, cond_delta_t: f64) -> f64 {
    if cond_delta_t <= 0.0 {
        return 0.0;
    }
    round4(design_tons * load_factor / 100.0 * 30.0 / cond_delta_t)
}
