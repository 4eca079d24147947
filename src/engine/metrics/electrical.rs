// ==========================================
// 冷水机组能效监测系统 - 电气指标计算
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 3.2 负载率 / 3.7 相不平衡
// ==========================================

use crate::engine::round::round4;

/// 负载率 (%)
///
/// # 规则
/// - 有负载百分比直读(PERCENT_LOAD 接线)则直接采用
/// - 否则 max(相电流) ÷ 满载电流 × 100
/// - 满载电流非正时无法归一,返回 0
pub fn load_factor(percent_load: Option<f64>, amps: [f64; 3], full_load_amps: f64) -> f64 {
    if let Some(pct) = percent_load {
        return round4(pct);
    }
    if full_load_amps <= 0.0 {
        return 0.0;
    }
    let max_amps = amps[0].max(amps[1]).max(amps[2]);
    round4(max_amps / full_load_amps * 100.0)
}

/// 相不平衡 (%) = max |相值 - 平均| ÷ 平均 × 100
///
/// 平均为 0(单相/未记录,其余相已归零)时返回 0
pub fn phase_imbalance(phases: [f64; 3]) -> f64 {
    let avg = (phases[0] + phases[1] + phases[2]) / 3.0;
    if avg == 0.0 {
        return 0.0;
    }
    let max_dev = phases
        .iter()
        .map(|p| (p - avg).abs())
        .fold(0.0_f64, f64::max);
    round4(max_dev / avg * 100.0)
}
