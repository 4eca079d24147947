// ==========================================
// 冷水机组能效监测系统 - 趋近温度计算
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 3.1 趋近温度
// 术语: 趋近 = 换热器两侧制冷剂与水的温差,效率指标
// ==========================================

use crate::engine::round::round4;

/// 冷凝器趋近温度 = 制冷剂温度 - 出水温度
///
/// 制冷剂温度缺失(直读与表推算皆无)时无法计算
pub fn cond_approach(cond_refrig_temp: Option<f64>, cond_outlet_temp: f64) -> Option<f64> {
    cond_refrig_temp.map(|rt| round4(rt - cond_outlet_temp))
}

/// 蒸发器趋近温度 = 出水温度 - 制冷剂温度
pub fn evap_approach(evap_outlet_temp: f64, evap_refrig_temp: Option<f64>) -> Option<f64> {
    evap_refrig_temp.map(|rt| round4(evap_outlet_temp - rt))
}

/// 趋近温度与设计值偏差
pub fn approach_variance(approach: Option<f64>, design_approach: f64) -> Option<f64> {
    approach.map(|a| round4(a - design_approach))
}
