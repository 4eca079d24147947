// ==========================================
// 冷水机组能效监测系统 - 能量当量与满载当量
// ==========================================
// 依据: Metrics_Formula_Spec_v1.0 - 3.11 能量当量 / 3.13 满载当量
// ==========================================

use crate::engine::round::round4;

/// kWh 换算 BTU 系数
const BTU_PER_KWH: f64 = 3412.0;

/// 年损失电量 (kWh) = 总损失% × 0.01 × 设计输入功率 × 年运行小时
pub fn kwh_loss(total_loss: f64, design_input_kw: f64, annual_run_hours: f64) -> f64 {
    round4(total_loss * 0.01 * design_input_kw * annual_run_hours)
}

/// 年损失热量 (BTU) = kWh 损失 × 3412
pub fn btu_loss(kwh_loss: f64) -> f64 {
    round4(kwh_loss * BTU_PER_KWH)
}

/// 年损失排放 (kgCO2) = kWh 损失 × 设备排放因子
pub fn co2_loss(kwh_loss: f64, emission_factor: f64) -> f64 {
    round4(kwh_loss * emission_factor)
}

/// 满载当量损失 = 损失% ÷ (负载率/100)
///
/// 负载归一化,便于不同负载工况比较;负载率非正时返回 0
pub fn full_load_equivalent(loss_pct: f64, load_factor: f64) -> f64 {
    if load_factor <= 0.0 {
        return 0.0;
    }
    round4(loss_pct / (load_factor / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kwh_loss() {
        // 10% × 300kW × 4000h = 120000 kWh
        assert_eq!(kwh_loss(10.0, 300.0, 4000.0), 120_000.0);
    }

    #[test]
    fn test_btu_loss() {
        assert_eq!(btu_loss(100.0), 341_200.0);
    }

    #[test]
    fn test_co2_loss() {
        assert_eq!(co2_loss(1000.0, 0.4), 400.0);
    }

    #[test]
    fn test_full_load_equivalent() {
        // 5% @ 50% 负载 → 满载当量 10%
        assert_eq!(full_load_equivalent(5.0, 50.0), 10.0);
        assert_eq!(full_load_equivalent(5.0, 100.0), 5.0);
    }

    #[test]
    fn test_full_load_equivalent_zero_load() {
        assert_eq!(full_load_equivalent(5.0, 0.0), 0.0);
    }
}
